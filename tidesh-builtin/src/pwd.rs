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

//! The `pwd` built-in: prints `Env::cwd`, the shell's own notion of the
//! current directory (kept in sync with the real one by `cd`, `pushd`
//! and `popd` via `Env::set_cwd`).

use tidesh_env::builtin::ExecResult;
use tidesh_env::Env;

pub fn main(env: &mut Env, _args: Vec<String>) -> ExecResult {
    println!("{}", env.cwd.display());
    ExecResult::new(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn prints_current_directory() {
        let (mut env, _guard) = fixture_env();
        let result = main(&mut env, vec![]);
        assert_eq!(result.exit_status, 0);
    }
}
