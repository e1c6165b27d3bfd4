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

//! The `eval` built-in: joins its operands with spaces and re-parses and
//! executes the result in the current shell environment.

use tidesh_env::builtin::ExecResult;
use tidesh_env::Env;
use tidesh_syntax::source::Source;

pub fn main(env: &mut Env, args: Vec<String>) -> ExecResult {
    if args.is_empty() {
        return ExecResult::new(0);
    }
    let script = args.join(" ");
    let status = tidesh_semantics::exec::execute_string_no_history(env, &script, Source::CommandLine);
    ExecResult::new(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn joins_operands_and_executes() {
        let (mut env, _guard) = fixture_env();
        let result = main(&mut env, vec!["export".into(), "FOO=bar".into()]);
        assert_eq!(result.exit_status, 0);
        assert_eq!(env.environment.get("FOO"), Some("bar"));
    }

    #[test]
    fn no_operands_succeeds_trivially() {
        let (mut env, _guard) = fixture_env();
        let result = main(&mut env, vec![]);
        assert_eq!(result.exit_status, 0);
    }
}
