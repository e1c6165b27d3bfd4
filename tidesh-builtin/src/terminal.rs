// This file is part of tidesh, a POSIX-style command shell.
// Copyright (C) 2026 The tidesh contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! The `terminal` built-in: a small diagnostic report of the controlling
//! terminal, for debugging job control and prompt rendering issues.

use std::io::IsTerminal;
use tidesh_env::builtin::ExecResult;
use tidesh_env::Env;

pub fn main(env: &mut Env, _args: Vec<String>) -> ExecResult {
    println!("stdin  is a tty: {}", std::io::stdin().is_terminal());
    println!("stdout is a tty: {}", std::io::stdout().is_terminal());
    println!("TERM:    {}", env.environment.get_or("TERM", "(unset)"));
    println!("COLUMNS: {}", env.environment.get_or("COLUMNS", "(unset)"));
    println!("LINES:   {}", env.environment.get_or("LINES", "(unset)"));
    println!("shell pgid: {}", env.shell_pgid);
    ExecResult::new(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn always_succeeds() {
        let (mut env, _guard) = fixture_env();
        let result = main(&mut env, vec![]);
        assert_eq!(result.exit_status, 0);
    }
}
