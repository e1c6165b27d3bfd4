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

//! The `popd` built-in: pops `Env::dirstack` and switches to the
//! directory it names.

use tidesh_env::builtin::ExecResult;
use tidesh_env::Env;

pub fn main(env: &mut Env, _args: Vec<String>) -> ExecResult {
    let Some(target) = env.dirstack.pop() else {
        eprintln!("tidesh: popd: directory stack empty");
        return ExecResult::new(1);
    };

    if let Err(e) = std::env::set_current_dir(&target) {
        eprintln!("tidesh: popd: {target}: {e}");
        return ExecResult::new(1);
    }

    env.set_cwd(target.into());
    println!("{}", env.cwd.display());
    ExecResult::new(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn pops_and_switches_back() {
        let (mut env, _guard) = fixture_env();
        let first = env.cwd.clone();
        env.dirstack.push(first.to_string_lossy().into_owned());

        let result = main(&mut env, vec![]);
        assert_eq!(result.exit_status, 0);
        assert_eq!(env.cwd, first);
        assert!(env.dirstack.is_empty());
    }

    #[test]
    fn empty_stack_is_an_error() {
        let (mut env, _guard) = fixture_env();
        let result = main(&mut env, vec![]);
        assert_eq!(result.exit_status, 1);
    }
}
