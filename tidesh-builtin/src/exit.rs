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

//! The `exit` built-in: requests that the whole shell process terminate.
//!
//! Setting `ExecResult::exit_shell` is how this reaches the entry loop —
//! see `tidesh_semantics::exec::simple::execute`, which copies it into
//! `Env::exit_requested` for the caller (the entry loop, or `-c`/script
//! evaluation) to notice after this command returns.

use tidesh_env::builtin::ExecResult;
use tidesh_env::Env;

use crate::common::ArgError;

/// `exit [status]`: with no operand, exits with the current `$?`;
/// otherwise with the given status, which must be a valid integer.
pub fn main(env: &mut Env, args: Vec<String>) -> ExecResult {
    match args.as_slice() {
        [] => ExecResult::exit(env.environment.exit_status()),
        [status] => match status.parse::<i32>() {
            Ok(status) => ExecResult::exit(status),
            Err(_) => {
                eprintln!("tidesh: exit: {}", ArgError::NotANumber(status.clone()));
                ExecResult::exit(2)
            }
        },
        _ => {
            eprintln!("tidesh: exit: {}", ArgError::TooManyOperands);
            ExecResult::new(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn no_operand_reuses_current_exit_status() {
        let (mut env, _guard) = fixture_env();
        env.environment.set_exit_status(7);
        let result = main(&mut env, vec![]);
        assert_eq!(result.exit_shell, Some(7));
    }

    #[test]
    fn operand_sets_requested_status() {
        let (mut env, _guard) = fixture_env();
        let result = main(&mut env, vec!["42".into()]);
        assert_eq!(result.exit_shell, Some(42));
        assert_eq!(result.exit_status, 42);
    }

    #[test]
    fn non_numeric_operand_is_a_syntax_error() {
        let (mut env, _guard) = fixture_env();
        let result = main(&mut env, vec!["nope".into()]);
        assert_eq!(result.exit_shell, Some(2));
    }
}
