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

//! The `cd` built-in.
//!
//! Operand resolution: omitted means `$HOME`; a single `-` means
//! `$OLDPWD` (and, since the target wasn't spelled out on the command
//! line, the resolved directory is echoed to stdout); anything else is
//! used as given, resolved against the current working directory if
//! relative. `$CDPATH` search and the logical/physical (`-L`/`-P`)
//! distinction are not carried over — tidesh tracks one `cwd` (see
//! `Env::cwd`) and always resolves it literally.

use std::path::{Path, PathBuf};
use tidesh_env::builtin::ExecResult;
use tidesh_env::Env;

pub fn main(env: &mut Env, args: Vec<String>) -> ExecResult {
    if args.len() > 1 {
        eprintln!("tidesh: cd: too many arguments");
        return ExecResult::new(2);
    }

    let (target, echo) = match args.first().map(String::as_str) {
        None | Some("") => match env.environment.get("HOME") {
            Some(home) if !home.is_empty() => (home.to_owned(), false),
            _ => {
                eprintln!("tidesh: cd: HOME not set");
                return ExecResult::new(3);
            }
        },
        Some("-") => match env.environment.get("OLDPWD") {
            Some(old) if !old.is_empty() => (old.to_owned(), true),
            _ => {
                eprintln!("tidesh: cd: OLDPWD not set");
                return ExecResult::new(3);
            }
        },
        Some(operand) => (operand.to_owned(), false),
    };

    let resolved = resolve(&env.cwd, &target);
    if let Err(e) = std::env::set_current_dir(&resolved) {
        eprintln!("tidesh: cd: {target}: {e}");
        return ExecResult::new(2);
    }

    env.set_cwd(resolved.clone());
    if echo {
        println!("{}", resolved.display());
    }

    let oldpwd = env.environment.get("OLDPWD").unwrap_or("").to_owned();
    tidesh_semantics::hooks::run(env, "cd", &[("OLDPWD", oldpwd.as_str())]);

    ExecResult::new(0)
}

pub(crate) fn resolve(cwd: &Path, target: &str) -> PathBuf {
    let target_path = Path::new(target);
    if target_path.is_absolute() {
        target_path.to_path_buf()
    } else {
        cwd.join(target_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn no_operand_changes_to_home() {
        let (mut env, _guard) = fixture_env();
        let home = env.environment.get("HOME").unwrap().to_owned();
        let result = main(&mut env, vec![]);
        assert_eq!(result.exit_status, 0);
        assert_eq!(env.cwd.to_string_lossy(), home);
    }

    #[test]
    fn dash_changes_to_oldpwd_and_rotates_pwd() {
        let (mut env, _guard) = fixture_env();
        let first = env.cwd.clone();
        let sub = first.join("sub");
        std::fs::create_dir(&sub).unwrap();
        main(&mut env, vec![sub.to_string_lossy().into_owned()]);
        assert_eq!(env.cwd, sub);

        main(&mut env, vec!["-".into()]);
        assert_eq!(env.cwd, first);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let (mut env, _guard) = fixture_env();
        let result = main(&mut env, vec!["/no/such/directory".into()]);
        assert_eq!(result.exit_status, 2);
    }
}
