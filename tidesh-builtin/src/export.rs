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

//! The `export` built-in.
//!
//! `tidesh_env::environment::Environment` has no shell-local/exported
//! distinction of its own: every variable it holds is already handed to
//! `execve`'s `envp` (see `to_assignment_strings`, and its use in
//! `tidesh_semantics::exec::simple::fork_and_run`). So `export` without a
//! `=value` just asserts the name exists (creating it empty if it
//! doesn't); with a `=value` it's an ordinary assignment. With no
//! operands, it lists every variable in reusable `export NAME=VALUE` form.

use tidesh_env::builtin::ExecResult;
use tidesh_env::Env;
use tidesh_quote::quote;

pub fn main(env: &mut Env, args: Vec<String>) -> ExecResult {
    if args.is_empty() {
        for (name, value) in env.environment.iter() {
            println!("export {name}={}", quote(value));
        }
        return ExecResult::new(0);
    }

    for arg in &args {
        match arg.split_once('=') {
            Some((name, value)) => env.environment.set(name, value),
            None if !env.environment.contains(arg) => env.environment.set(arg, ""),
            None => {}
        }
    }
    ExecResult::new(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn assigns_name_equals_value() {
        let (mut env, _guard) = fixture_env();
        main(&mut env, vec!["FOO=bar".into()]);
        assert_eq!(env.environment.get("FOO"), Some("bar"));
    }

    #[test]
    fn bare_name_creates_empty_variable_if_unset() {
        let (mut env, _guard) = fixture_env();
        main(&mut env, vec!["FOO".into()]);
        assert_eq!(env.environment.get("FOO"), Some(""));
    }

    #[test]
    fn bare_name_does_not_clobber_existing_value() {
        let (mut env, _guard) = fixture_env();
        env.environment.set("FOO", "bar");
        main(&mut env, vec!["FOO".into()]);
        assert_eq!(env.environment.get("FOO"), Some("bar"));
    }
}
