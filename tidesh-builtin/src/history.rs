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

//! The `history` built-in: lists `Env::history`, or clears it with `-c`.

use tidesh_env::builtin::ExecResult;
use tidesh_env::Env;

pub fn main(env: &mut Env, args: Vec<String>) -> ExecResult {
    if args.iter().any(|a| a == "-c") {
        env.history.clear();
        return ExecResult::new(0);
    }

    for (i, entry) in env.history.iter().enumerate() {
        println!("{:5}  {}", i + 1, entry.command);
    }
    ExecResult::new(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn dash_c_clears_history() {
        let (mut env, _guard) = fixture_env();
        env.history.append("echo hi", 1);
        let result = main(&mut env, vec!["-c".into()]);
        assert_eq!(result.exit_status, 0);
        assert!(env.history.is_empty());
    }

    #[test]
    fn no_args_lists_without_clearing() {
        let (mut env, _guard) = fixture_env();
        env.history.append("echo hi", 1);
        let result = main(&mut env, vec![]);
        assert_eq!(result.exit_status, 0);
        assert_eq!(env.history.len(), 1);
    }
}
