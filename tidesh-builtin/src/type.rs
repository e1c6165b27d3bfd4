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

//! The `type` built-in: classifies each operand as an alias, a builtin
//! or an external command found on `$PATH`, checked in that order
//! (matching the first-word resolution order `exec::simple` itself
//! uses).

use tidesh_env::builtin::ExecResult;
use tidesh_env::Env;

pub fn main(env: &mut Env, args: Vec<String>) -> ExecResult {
    if args.is_empty() {
        eprintln!("tidesh: type: missing operand");
        return ExecResult::new(2);
    }

    let mut status = 0;
    for name in &args {
        if let Some(alias) = env.aliases.get(name) {
            println!("{name} is aliased to `{}'", alias.replacement);
        } else if env.builtin(name).is_some() {
            println!("{name} is a shell builtin");
        } else {
            let path_var = env.environment.get_or("PATH", "").to_owned();
            match env.path_index.resolve(name, &path_var) {
                Some(path) => println!("{name} is {}", path.display()),
                None => {
                    println!("{name}: not found");
                    status = 1;
                }
            }
        }
    }
    ExecResult::new(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn reports_builtin() {
        let (mut env, _guard) = fixture_env();
        env.register_builtin(
            ":",
            tidesh_env::builtin::Builtin::new(tidesh_env::builtin::Type::Regular, crate::colon::main),
        );
        let result = main(&mut env, vec![":".into()]);
        assert_eq!(result.exit_status, 0);
    }

    #[test]
    fn unknown_name_reports_not_found() {
        let (mut env, _guard) = fixture_env();
        let result = main(&mut env, vec!["definitely-not-a-real-command".into()]);
        assert_eq!(result.exit_status, 1);
    }

    #[test]
    fn missing_operand_is_an_error() {
        let (mut env, _guard) = fixture_env();
        let result = main(&mut env, vec![]);
        assert_eq!(result.exit_status, 2);
    }
}
