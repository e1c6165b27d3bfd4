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

//! The interactive entry loop: editor → lexer → parser → executor,
//! driven one complete (possibly multi-line) command at a time.
//!
//! The real line editor (raw-mode TTY, autosuggestions, tab completion)
//! is an external collaborator; this module only depends on it through
//! [`LineSource`], a two-method capability a real editor would implement
//! just as easily as the [`StdinLineSource`] placeholder shipped here.

use std::io::{self, BufRead, Write};
use tidesh_env::Env;
use tidesh_syntax::lexer::NullHost;
use tidesh_syntax::parser::{parse_line, ParseError, ParserOptions};
use tidesh_syntax::source::Source;

/// A source of input lines for the entry loop. `prompt` is the text the
/// implementor should display before reading (a real line editor would
/// render it itself; [`StdinLineSource`] just prints it to stdout).
pub trait LineSource {
    /// Reads one physical line (without its trailing newline), or
    /// returns `None` on end of input.
    fn read_line(&mut self, prompt: &str) -> Option<String>;
}

/// Placeholder for the out-of-scope raw-mode line editor: prints `prompt`
/// to stdout and reads one line from stdin with ordinary buffered I/O.
/// Retries on `EINTR` (SIGWINCH arriving mid-`read`) rather than treating
/// it as end of input.
pub struct StdinLineSource {
    stdin: io::Stdin,
}

impl StdinLineSource {
    #[must_use]
    pub fn new() -> Self {
        StdinLineSource { stdin: io::stdin() }
    }
}

impl Default for StdinLineSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for StdinLineSource {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        print!("{prompt}");
        let _ = io::stdout().flush();

        let mut line = String::new();
        loop {
            line.clear();
            match self.stdin.lock().read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {
                    if line.ends_with('\n') {
                        line.pop();
                        if line.ends_with('\r') {
                            line.pop();
                        }
                    }
                    return Some(line);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => return None,
            }
        }
    }
}

/// Whether `errors` signal that the accumulated buffer is syntactically
/// incomplete rather than genuinely malformed: an unmatched `(` or a
/// here-document whose marker never arrived both mean "read another
/// line", not "report a diagnostic".
fn needs_more_input(errors: &[ParseError]) -> bool {
    errors
        .iter()
        .any(|e| matches!(e, ParseError::UnclosedSubshell { .. } | ParseError::MissingHereDocBody { .. }))
}

/// Reads one complete command, prompting with `$PS1` then `$PS2` for
/// each continuation line, feeding a dry parse (against a [`NullHost`],
/// so `$(…)` is never actually run just to check completeness) to decide
/// whether another line is needed. Returns `None` at EOF with nothing
/// buffered yet.
fn read_complete_command(env: &mut Env, source: &mut dyn LineSource) -> Option<String> {
    let primary = tidesh_prompt::render(env, tidesh_prompt::Kind::Primary);
    let mut buffer = source.read_line(&primary)?;

    loop {
        let mut host = NullHost;
        let parser_options = parser_options(env);
        let (_, errors) = parse_line(&buffer, Source::CommandLine, Some(&env.aliases), parser_options, &mut host);
        if !needs_more_input(&errors) {
            return Some(buffer);
        }
        let continuation = tidesh_prompt::render(env, tidesh_prompt::Kind::Continuation);
        let Some(next) = source.read_line(&continuation) else {
            return Some(buffer);
        };
        buffer.push('\n');
        buffer.push_str(&next);
    }
}

fn parser_options(env: &Env) -> ParserOptions {
    use tidesh_env::features::Feature;
    ParserOptions {
        aliases: env.features.is_enabled(Feature::AliasExpansion),
        pipes: env.features.is_enabled(Feature::Pipes),
        sequences: env.features.is_enabled(Feature::Sequences),
        subshells: env.features.is_enabled(Feature::Subshells),
        assignments: env.features.is_enabled(Feature::Assignments),
        redirections: env.features.is_enabled(Feature::Redirections),
    }
}

/// Drives the interactive loop until `source` reaches EOF or a command
/// sets `env.exit_requested`. Between commands: polls job-state
/// transitions (printing notifications), clears the "please resize"
/// flag (there is no raw-mode redraw to trigger here, but the flag must
/// not be left latched), and resets the history navigation cursor.
pub fn run(env: &mut Env, source: &mut dyn LineSource) {
    loop {
        if env.exit_requested.is_some() {
            return;
        }

        tidesh_semantics::exec::jobs::poll(env);
        let _ = tidesh_env::signals::take_window_resized();
        env.history.reset_cursor();

        let Some(line) = read_complete_command(env, source) else {
            env.exit_requested = Some(env.environment.exit_status());
            return;
        };

        if tidesh_env::signals::take_interrupted() {
            // A Ctrl-C that arrived while reading is not part of the
            // command that follows it; discard the line like an empty
            // input and start the next prompt cycle fresh.
            continue;
        }

        tidesh_semantics::hooks::run(env, "before_cmd", &[]);
        tidesh_semantics::exec::execute_string(env, &line, Source::CommandLine);
        tidesh_semantics::hooks::run(env, "after_cmd", &[]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    struct ScriptedLines {
        lines: std::collections::VecDeque<String>,
    }

    impl ScriptedLines {
        fn new(lines: &[&str]) -> Self {
            ScriptedLines {
                lines: lines.iter().map(|s| (*s).to_owned()).collect(),
            }
        }
    }

    impl LineSource for ScriptedLines {
        fn read_line(&mut self, _prompt: &str) -> Option<String> {
            self.lines.pop_front()
        }
    }

    #[test]
    fn single_line_command_needs_no_continuation() {
        let (mut env, _guard) = fixture_env();
        let mut lines = ScriptedLines::new(&["echo hi"]);
        let result = read_complete_command(&mut env, &mut lines);
        assert_eq!(result.as_deref(), Some("echo hi"));
    }

    #[test]
    fn unmatched_paren_pulls_in_a_continuation_line() {
        let (mut env, _guard) = fixture_env();
        let mut lines = ScriptedLines::new(&["(echo hi", ")"]);
        let result = read_complete_command(&mut env, &mut lines);
        assert_eq!(result.as_deref(), Some("(echo hi\n)"));
    }

    #[test]
    fn unterminated_heredoc_pulls_in_continuation_lines() {
        let (mut env, _guard) = fixture_env();
        let mut lines = ScriptedLines::new(&["cat <<EOF", "hello", "EOF"]);
        let result = read_complete_command(&mut env, &mut lines);
        assert_eq!(result.as_deref(), Some("cat <<EOF\nhello\nEOF"));
    }

    #[test]
    fn eof_mid_continuation_returns_what_was_buffered() {
        let (mut env, _guard) = fixture_env();
        let mut lines = ScriptedLines::new(&["(echo hi"]);
        let result = read_complete_command(&mut env, &mut lines);
        assert_eq!(result.as_deref(), Some("(echo hi"));
    }

    #[test]
    fn eof_with_nothing_buffered_yields_none() {
        let (mut env, _guard) = fixture_env();
        let mut lines = ScriptedLines::new(&[]);
        assert_eq!(read_complete_command(&mut env, &mut lines), None);
    }

    #[test]
    fn run_stops_at_eof() {
        let (mut env, _guard) = fixture_env();
        tidesh_builtin::register_all(&mut env);
        let mut lines = ScriptedLines::new(&["FOO=bar", "exit 0"]);
        run(&mut env, &mut lines);
        assert_eq!(env.exit_requested, Some(0));
        assert_eq!(env.environment.get("FOO"), Some("bar"));
    }
}
