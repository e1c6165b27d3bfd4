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

//! The `pushd` built-in: swaps the current directory with an operand,
//! pushing the old one onto `Env::dirstack`.

use tidesh_env::builtin::ExecResult;
use tidesh_env::Env;

use crate::cd::resolve;

pub fn main(env: &mut Env, args: Vec<String>) -> ExecResult {
    let target = match args.as_slice() {
        [] => {
            eprintln!("tidesh: pushd: no other directory");
            return ExecResult::new(1);
        }
        [target] => target.clone(),
        _ => {
            eprintln!("tidesh: pushd: too many arguments");
            return ExecResult::new(2);
        }
    };

    let resolved = resolve(&env.cwd, &target);
    if let Err(e) = std::env::set_current_dir(&resolved) {
        eprintln!("tidesh: pushd: {target}: {e}");
        return ExecResult::new(2);
    }

    let previous = env.cwd.to_string_lossy().into_owned();
    env.dirstack.push(previous);
    env.set_cwd(resolved.clone());
    println!("{}", resolved.display());
    ExecResult::new(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn pushes_old_directory_and_switches() {
        let (mut env, _guard) = fixture_env();
        let first = env.cwd.clone();
        let sub = first.join("sub");
        std::fs::create_dir(&sub).unwrap();

        let result = main(&mut env, vec![sub.to_string_lossy().into_owned()]);
        assert_eq!(result.exit_status, 0);
        assert_eq!(env.cwd, sub);
        assert_eq!(env.dirstack.peek(0), Some(first.to_string_lossy().as_ref()));
    }

    #[test]
    fn no_operand_is_an_error() {
        let (mut env, _guard) = fixture_env();
        let result = main(&mut env, vec![]);
        assert_eq!(result.exit_status, 1);
    }
}
