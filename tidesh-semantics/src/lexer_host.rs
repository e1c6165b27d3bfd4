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

//! Wires the lexer's [`LexerHost`] callback capability to the live
//! executor, so `$(…)` and pre-expanded here-strings run against the real
//! session instead of a stub.

use tidesh_env::Env;
use tidesh_syntax::lexer::LexerHost;

use crate::exec::execute_string_stdout;
use crate::expand;

/// Borrows the running session for the lifetime of a single top-level
/// parse, so `$(…)` can recurse into [`execute_string_stdout`] and
/// here-strings can be expanded through the real pipeline.
pub struct ExecutingHost<'a> {
    env: &'a mut Env,
}

impl<'a> ExecutingHost<'a> {
    pub fn new(env: &'a mut Env) -> Self {
        ExecutingHost { env }
    }
}

impl LexerHost for ExecutingHost<'_> {
    fn substitute_command(&mut self, command_text: &str) -> String {
        let output = execute_string_stdout(self.env, command_text);
        output.trim_end_matches('\n').to_owned()
    }

    fn expand_word(&mut self, word: &str) -> Vec<String> {
        expand::expand_word(self.env, word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn substitute_command_strips_trailing_newlines() {
        let (mut env, _guard) = fixture_env();
        let mut host = ExecutingHost::new(&mut env);
        assert_eq!(host.substitute_command("echo foo"), "foo");
    }

    #[test]
    fn expand_word_delegates_to_the_expansion_pipeline() {
        let (mut env, _guard) = fixture_env();
        env.environment.set("X", "hi");
        let mut host = ExecutingHost::new(&mut env);
        assert_eq!(host.expand_word("$X"), vec!["hi".to_owned()]);
    }
}
