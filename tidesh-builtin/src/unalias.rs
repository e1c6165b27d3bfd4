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

//! The `unalias` built-in: `unalias -a` removes every alias, `unalias
//! name...` removes the named ones.

use tidesh_env::builtin::ExecResult;
use tidesh_env::Env;

use crate::common::ArgError;

pub fn main(env: &mut Env, args: Vec<String>) -> ExecResult {
    if args.is_empty() {
        eprintln!("tidesh: unalias: {}", ArgError::MissingOperand);
        return ExecResult::new(2);
    }
    if args.iter().any(|a| a == "-a") {
        env.aliases.clear();
        return ExecResult::new(0);
    }

    let mut status = 0;
    for name in &args {
        if env.aliases.remove(name).is_none() {
            eprintln!("tidesh: unalias: {name}: not found");
            status = 1;
        }
    }
    ExecResult::new(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;
    use tidesh_syntax::source::Location;

    #[test]
    fn removes_named_alias() {
        let (mut env, _guard) = fixture_env();
        env.aliases.insert("ll".into(), "ls -l".into(), Location::dummy());
        let result = main(&mut env, vec!["ll".into()]);
        assert_eq!(result.exit_status, 0);
        assert!(env.aliases.get("ll").is_none());
    }

    #[test]
    fn dash_a_clears_everything() {
        let (mut env, _guard) = fixture_env();
        env.aliases.insert("ll".into(), "ls -l".into(), Location::dummy());
        main(&mut env, vec!["-a".into()]);
        assert!(env.aliases.is_empty());
    }
}
