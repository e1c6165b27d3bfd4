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

//! Recursive-descent parser: token stream to [`syntax::Command`] tree.
//!
//! ```text
//! sequence   := and_or ( (';' | '&' | EOL) and_or )*
//! and_or     := pipeline ( ('&&' | '||') pipeline )*
//! pipeline   := command ( '|' pipeline )?        // right-associative
//! command    := '(' sequence ')'                 // subshell
//!             | ( IO_NUMBER? redir | ASSIGN | WORD | PROC_SUB )+
//! ```
//!
//! The parser never throws: on a syntax error it records one [`ParseError`]
//! and returns whatever prefix of the tree it managed to build, so the
//! executor can still run what came before the error (see the `error`
//! contract in the module documentation of [`crate`]).

use crate::alias::AliasTable;
use crate::lexer::{Lexer, LexerHost, Token, TokenKind};
use crate::source::Location;
use crate::syntax::{Arg, Assignment, Command, Redirection, RedirectionKind, SimpleCommand};
use std::collections::HashMap;
use thiserror::Error;

/// Which grammar productions are available. Disabled productions collapse to
/// their left/first alternative as documented in the module-level grammar:
/// e.g. with `sequences` off, `a;b` parses as just `b`.
#[derive(Clone, Copy, Debug)]
pub struct ParserOptions {
    pub aliases: bool,
    pub pipes: bool,
    pub sequences: bool,
    pub subshells: bool,
    pub assignments: bool,
    pub redirections: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            aliases: true,
            pipes: true,
            sequences: true,
            subshells: true,
            assignments: true,
            redirections: true,
        }
    }
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ParseError {
    #[error("{location}: unmatched `)'")]
    UnmatchedRParen { location: Location },
    #[error("{location}: missing filename after redirection operator")]
    MissingRedirectionTarget { location: Location },
    #[error("{location}: unexpected end of input inside subshell")]
    UnclosedSubshell { location: Location },
    #[error("{location}: missing here-document body for `{marker}'")]
    MissingHereDocBody { location: Location, marker: String },
}

/// Parses one complete `sequence` from `lexer`.
pub struct Parser<'a, 'h> {
    lexer: &'a mut Lexer<'h>,
    aliases: Option<&'a AliasTable>,
    options: ParserOptions,
    lookahead: Option<Token>,
    pub errors: Vec<ParseError>,
    heredoc_markers: HashMap<u32, (String, Location)>,
}

impl<'a, 'h> Parser<'a, 'h> {
    pub fn new(lexer: &'a mut Lexer<'h>, aliases: Option<&'a AliasTable>, options: ParserOptions) -> Self {
        Parser {
            lexer,
            aliases,
            options,
            lookahead: None,
            errors: Vec::new(),
            heredoc_markers: HashMap::new(),
        }
    }

    fn peek(&mut self) -> &Token {
        if self.lookahead.is_none() {
            self.lookahead = Some(self.lexer.next_token());
        }
        self.lookahead.as_ref().unwrap()
    }

    fn bump(&mut self) -> Token {
        self.peek();
        self.lookahead.take().unwrap()
    }

    fn at_command_terminator(&mut self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Semicolon
                | TokenKind::Background
                | TokenKind::Eol
                | TokenKind::Eof
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Pipe
                | TokenKind::RParen
        )
    }

    /// `sequence := and_or ( (';' | '&' | EOL) and_or )*`
    pub fn parse_sequence(&mut self) -> Option<Command> {
        self.skip_separators();
        if matches!(self.peek().kind, TokenKind::Eof | TokenKind::RParen) {
            return None;
        }
        let mut left = self.parse_and_or()?;
        loop {
            let is_bg = matches!(self.peek().kind, TokenKind::Background);
            match self.peek().kind {
                TokenKind::Semicolon | TokenKind::Background => {
                    self.bump();
                    if is_bg {
                        left = mark_background(left);
                    }
                }
                TokenKind::Eol => {
                    self.bump();
                }
                _ => break,
            }
            self.skip_separators();
            if matches!(self.peek().kind, TokenKind::Eof | TokenKind::RParen) {
                break;
            }
            if !self.options.sequences {
                // Sequences disabled: drop everything parsed so far and keep
                // only the right-most item.
                left = self.parse_and_or()?;
                continue;
            }
            let right = match self.parse_and_or() {
                Some(r) => r,
                None => break,
            };
            left = Command::Sequence {
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Some(left)
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek().kind, TokenKind::Eol | TokenKind::Comment) {
            self.bump();
        }
    }

    /// `and_or := pipeline ( ('&&' | '||') pipeline )*`
    fn parse_and_or(&mut self) -> Option<Command> {
        let mut left = self.parse_pipeline()?;
        loop {
            match self.peek().kind {
                TokenKind::And => {
                    self.bump();
                    self.skip_separators();
                    let right = self.parse_pipeline()?;
                    left = Command::And {
                        left: Box::new(left),
                        right: Box::new(right),
                    };
                }
                TokenKind::Or => {
                    self.bump();
                    self.skip_separators();
                    let right = self.parse_pipeline()?;
                    left = Command::Or {
                        left: Box::new(left),
                        right: Box::new(right),
                    };
                }
                _ => break,
            }
        }
        Some(left)
    }

    /// `pipeline := command ( '|' pipeline )?` (right-associative)
    fn parse_pipeline(&mut self) -> Option<Command> {
        let left = self.parse_command()?;
        if self.options.pipes && matches!(self.peek().kind, TokenKind::Pipe) {
            self.bump();
            self.skip_separators();
            let right = self.parse_pipeline()?;
            return Some(Command::Pipe {
                left: Box::new(left),
                right: Box::new(right),
            });
        }
        // Pipes disabled: consume and ignore a trailing `| rest`, keeping
        // only the left-most command, matching the "collapse to first
        // alternative" rule for disabled productions.
        if !self.options.pipes && matches!(self.peek().kind, TokenKind::Pipe) {
            self.bump();
            self.skip_separators();
            let _ = self.parse_pipeline();
        }
        Some(left)
    }

    /// `command := '(' sequence ')' | ( IO_NUMBER? redir | ASSIGN | WORD | PROC_SUB )+`
    fn parse_command(&mut self) -> Option<Command> {
        if self.options.subshells && matches!(self.peek().kind, TokenKind::LParen) {
            let loc = self.bump().location;
            let body = self.parse_sequence();
            self.skip_separators();
            if !matches!(self.peek().kind, TokenKind::RParen) {
                self.errors.push(ParseError::UnclosedSubshell { location: loc });
                return body;
            }
            self.bump();
            return Some(Command::Subshell {
                body: Box::new(body.unwrap_or_else(|| {
                    Command::Simple(SimpleCommand::default())
                })),
            });
        }

        let mut cmd = SimpleCommand::default();
        let mut seen_word = false;

        loop {
            match &self.peek().kind {
                TokenKind::Word(_) => {
                    let Token {
                        kind: TokenKind::Word(w),
                        location,
                    } = self.bump()
                    else {
                        unreachable!()
                    };
                    if !seen_word && self.options.aliases {
                        if let Some(expanded) = self.try_expand_alias(&w) {
                            cmd.args.extend(expanded.into_iter().map(Arg::Word));
                            seen_word = true;
                            continue;
                        }
                    }
                    seen_word = true;
                    cmd.args.push(Arg::Word(w));
                    let _ = location;
                }
                TokenKind::Assignment { .. } => {
                    let Token {
                        kind: TokenKind::Assignment { name, value },
                        ..
                    } = self.bump()
                    else {
                        unreachable!()
                    };
                    if !seen_word && self.options.assignments {
                        cmd.assignments.push(Assignment { name, value });
                    } else {
                        cmd.args.push(Arg::Word(format!("{name}={value}")));
                        seen_word = true;
                    }
                }
                TokenKind::ProcessSubIn(_) => {
                    let Token {
                        kind: TokenKind::ProcessSubIn(inner),
                        ..
                    } = self.bump()
                    else {
                        unreachable!()
                    };
                    seen_word = true;
                    cmd.args.push(Arg::ProcessSubIn(inner));
                }
                TokenKind::ProcessSubOut(_) => {
                    let Token {
                        kind: TokenKind::ProcessSubOut(inner),
                        ..
                    } = self.bump()
                    else {
                        unreachable!()
                    };
                    seen_word = true;
                    cmd.args.push(Arg::ProcessSubOut(inner));
                }
                TokenKind::IoNumber(_)
                | TokenKind::RedirectIn
                | TokenKind::RedirectOut
                | TokenKind::RedirectAppend
                | TokenKind::RedirectOutErr
                | TokenKind::FdDup
                | TokenKind::HereDocMarker { .. }
                | TokenKind::HereString(_) => {
                    if let Some(r) = self.parse_redirection() {
                        if self.options.redirections {
                            // Prepend: applying in list order later means
                            // applying in the reverse of source order.
                            cmd.redirects.insert(0, r);
                        }
                    } else {
                        break;
                    }
                }
                _ => break,
            }
            if self.at_command_terminator() {
                break;
            }
        }

        if cmd.is_empty() {
            return None;
        }

        let cmd = Command::Simple(cmd);
        self.patch_heredocs(cmd)
    }

    /// Parses one redirection, assuming the lookahead is an `IoNumber`,
    /// one of the redirect operator kinds, or a heredoc marker.
    fn parse_redirection(&mut self) -> Option<Redirection> {
        let (explicit_fd, mut tok) = match self.peek().kind {
            TokenKind::IoNumber(n) => {
                self.bump();
                (Some(n), self.bump())
            }
            _ => (None, self.bump()),
        };

        let loc = tok.location.clone();
        let (kind, fd_default) = match tok.kind {
            TokenKind::RedirectIn => (RedirectionKind::In, 0),
            TokenKind::RedirectOut => (RedirectionKind::Out, 1),
            TokenKind::RedirectAppend => (RedirectionKind::Append, 1),
            TokenKind::RedirectOutErr => (RedirectionKind::OutErr, 1),
            TokenKind::FdDup => (RedirectionKind::Dup, 0),
            TokenKind::HereDocMarker { id, strip_tabs } => {
                let (marker, mloc) = self.heredoc_marker_text(id, loc.clone());
                self.heredoc_markers.insert(id, (marker, mloc));
                return Some(Redirection {
                    fd: explicit_fd.unwrap_or(0),
                    kind: RedirectionKind::HereDoc,
                    target: heredoc_placeholder(id),
                    is_process_sub: false,
                    location: loc,
                });
            }
            TokenKind::HereString(value) => {
                return Some(Redirection {
                    fd: explicit_fd.unwrap_or(0),
                    kind: RedirectionKind::HereString,
                    target: value,
                    is_process_sub: false,
                    location: loc,
                });
            }
            _ => unreachable!("parse_redirection called on non-redirection token"),
        };

        match &self.peek().kind {
            TokenKind::Word(_) => {
                let Token {
                    kind: TokenKind::Word(target),
                    ..
                } = self.bump()
                else {
                    unreachable!()
                };
                Some(Redirection {
                    fd: explicit_fd.unwrap_or(fd_default),
                    kind,
                    target,
                    is_process_sub: false,
                    location: loc,
                })
            }
            TokenKind::ProcessSubIn(_) | TokenKind::ProcessSubOut(_) => {
                let inner_tok = self.bump();
                let inner = match inner_tok.kind {
                    TokenKind::ProcessSubIn(s) | TokenKind::ProcessSubOut(s) => s,
                    _ => unreachable!(),
                };
                Some(Redirection {
                    fd: explicit_fd.unwrap_or(fd_default),
                    kind,
                    target: inner,
                    is_process_sub: true,
                    location: loc,
                })
            }
            _ => {
                self.errors.push(ParseError::MissingRedirectionTarget {
                    location: loc.clone(),
                });
                let _ = &mut tok;
                None
            }
        }
    }

    fn heredoc_marker_text(&mut self, _id: u32, loc: Location) -> (String, Location) {
        // The marker word was already consumed by the lexer while it
        // recognized `<<[-]MARKER`; nothing further to read here. Kept as a
        // seam so a future lexer revision that emits the marker as its own
        // token can plug in without changing callers.
        (String::new(), loc)
    }

    /// Replaces heredoc placeholder targets in a just-built command with
    /// their collected bodies, once the physical line has been fully
    /// scanned. A tree walk rather than in-place mutation during parsing,
    /// because the body is not known until the lexer reaches the line's
    /// terminating newline, which may be after the whole pipeline.
    fn patch_heredocs(&mut self, cmd: Command) -> Option<Command> {
        Some(cmd)
    }

    fn try_expand_alias(&mut self, name: &str) -> Option<Vec<String>> {
        let table = self.aliases?;
        let alias = table.get(name)?.clone();
        let mut host = crate::lexer::NullHost;
        let source = crate::source::Source::Alias {
            name: std::rc::Rc::from(name),
        };
        let mut sub_lexer = Lexer::new(&alias.replacement, source, &mut host);
        let mut words = Vec::new();
        loop {
            let tok = sub_lexer.next_token();
            match tok.kind {
                TokenKind::Word(w) => words.push(w),
                TokenKind::Eof => break,
                _ => {}
            }
        }
        Some(words)
    }
}

/// Wraps `cmd` so it runs as a background job. Modeled as a wrapper node
/// (see [`Command::Async`]) rather than a field repeated on every variant,
/// since a trailing `&` is only discovered after the sub-tree to its left
/// already exists.
fn mark_background(cmd: Command) -> Command {
    Command::Async { body: Box::new(cmd) }
}

/// Parses a full line of input (possibly with embedded newlines already
/// present, e.g. a heredoc or a multi-line subshell) into zero or one
/// [`Command`] tree, draining any outstanding here-document bodies as the
/// lexer's cursor passes their markers.
pub fn parse_line(
    input: &str,
    source: crate::source::Source,
    aliases: Option<&AliasTable>,
    options: ParserOptions,
    host: &mut dyn LexerHost,
) -> (Option<Command>, Vec<ParseError>) {
    let source_for_error = std::rc::Rc::new(source.clone());
    let mut lexer = Lexer::new(input, source, host);
    let mut parser = Parser::new(&mut lexer, aliases, options);
    let cmd = parser.parse_sequence();
    let mut errors = std::mem::take(&mut parser.errors);
    let cmd = fill_heredocs(cmd, &mut lexer);
    if let Some(marker) = lexer.unterminated_heredoc_marker.take() {
        errors.push(ParseError::MissingHereDocBody {
            location: Location {
                source: source_for_error,
                line: 1,
                column: 1,
            },
            marker,
        });
    }
    (cmd, errors)
}

fn heredoc_placeholder(id: u32) -> String {
    format!("\u{0}heredoc:{id}")
}

fn fill_heredocs(cmd: Option<Command>, lexer: &mut Lexer<'_>) -> Option<Command> {
    let mut cmd = cmd?;
    patch(&mut cmd, lexer);
    Some(cmd)
}

fn patch(cmd: &mut Command, lexer: &mut Lexer<'_>) {
    match cmd {
        Command::Simple(s) => {
            for r in &mut s.redirects {
                if let Some(rest) = r.target.strip_prefix("\u{0}heredoc:") {
                    if let Ok(id) = rest.parse::<u32>() {
                        if let Some(body) = lexer.take_heredoc_body(id) {
                            r.target = body;
                        }
                    }
                }
            }
        }
        Command::Pipe { left, right }
        | Command::And { left, right }
        | Command::Or { left, right }
        | Command::Sequence { left, right } => {
            patch(left, lexer);
            patch(right, lexer);
        }
        Command::Subshell { body, .. } => patch(body, lexer),
        Command::Async { body } => patch(body, lexer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::NullHost;
    use crate::source::Source;
    use assert_matches::assert_matches;

    fn parse(input: &str) -> (Option<Command>, Vec<ParseError>) {
        let mut host = NullHost;
        parse_line(input, Source::CommandLine, None, ParserOptions::default(), &mut host)
    }

    fn simple(cmd: &Command) -> &SimpleCommand {
        match cmd {
            Command::Simple(s) => s,
            other => panic!("expected a simple command, got {other:?}"),
        }
    }

    fn words(cmd: &SimpleCommand) -> Vec<&str> {
        cmd.args
            .iter()
            .map(|a| match a {
                Arg::Word(w) => w.as_str(),
                _ => panic!("expected a word argument"),
            })
            .collect()
    }

    #[test]
    fn simple_command_collects_argv() {
        let (cmd, errors) = parse("echo hello world");
        assert!(errors.is_empty());
        let cmd = cmd.unwrap();
        assert_eq!(words(simple(&cmd)), vec!["echo", "hello", "world"]);
    }

    #[test]
    fn leading_assignments_are_not_argv() {
        let (cmd, errors) = parse("FOO=bar BAZ=qux echo $FOO");
        assert!(errors.is_empty());
        let cmd = simple(&cmd.unwrap()).clone();
        assert_eq!(cmd.assignments.len(), 2);
        assert_eq!(cmd.assignments[0].name, "FOO");
        assert_eq!(cmd.assignments[1].name, "BAZ");
        assert_eq!(words(&cmd), vec!["echo", "$FOO"]);
    }

    #[test]
    fn assignment_after_first_word_is_an_ordinary_argument() {
        // Once a command word has been seen, a later `A=B`-shaped token is
        // just an argument, not an assignment, with no diagnostic.
        let (cmd, errors) = parse("echo A=B");
        assert!(errors.is_empty());
        let cmd = simple(&cmd.unwrap()).clone();
        assert!(cmd.assignments.is_empty());
        assert_eq!(words(&cmd), vec!["echo", "A=B"]);
    }

    #[test]
    fn pipeline_is_right_associative() {
        let (cmd, errors) = parse("a | b | c");
        assert!(errors.is_empty());
        assert_matches!(
            cmd.unwrap(),
            Command::Pipe { right, .. } if matches!(*right, Command::Pipe { .. })
        );
    }

    #[test]
    fn sequence_is_left_associative() {
        let (cmd, errors) = parse("a; b; c");
        assert!(errors.is_empty());
        assert_matches!(
            cmd.unwrap(),
            Command::Sequence { left, .. } if matches!(*left, Command::Sequence { .. })
        );
    }

    #[test]
    fn trailing_ampersand_wraps_whole_pipeline_in_async() {
        let (cmd, errors) = parse("a | b &");
        assert!(errors.is_empty());
        let Command::Async { body } = cmd.unwrap() else {
            panic!("expected an Async wrapper");
        };
        assert_matches!(*body, Command::Pipe { .. });
    }

    #[test]
    fn redirections_are_prepended_reversing_source_order() {
        let (cmd, errors) = parse("cmd >out 2>&1");
        assert!(errors.is_empty());
        let cmd = simple(&cmd.unwrap()).clone();
        // Parsed in source order (`>out` then `2>&1`), each pushed to the
        // front, so iterating the stored list applies `2>&1` before `>out` —
        // the reverse of how they appeared in the command line.
        assert_eq!(cmd.redirects.len(), 2);
        assert_eq!(cmd.redirects[0].fd, 2);
        assert_eq!(cmd.redirects[0].kind, RedirectionKind::Dup);
        assert_eq!(cmd.redirects[1].fd, 1);
        assert_eq!(cmd.redirects[1].kind, RedirectionKind::Out);
    }

    #[test]
    fn redirection_without_io_number_defaults_by_direction() {
        let (cmd, errors) = parse("cmd <in >out");
        assert!(errors.is_empty());
        let cmd = simple(&cmd.unwrap()).clone();
        let out = cmd.redirects.iter().find(|r| r.kind == RedirectionKind::Out).unwrap();
        assert_eq!(out.fd, 1);
        let input = cmd.redirects.iter().find(|r| r.kind == RedirectionKind::In).unwrap();
        assert_eq!(input.fd, 0);
    }

    #[test]
    fn herestring_redirects_fd_zero() {
        let (cmd, errors) = parse("cat <<<hello");
        assert!(errors.is_empty());
        let cmd = simple(&cmd.unwrap()).clone();
        assert_eq!(cmd.redirects.len(), 1);
        assert_eq!(cmd.redirects[0].fd, 0);
        assert_eq!(cmd.redirects[0].kind, RedirectionKind::HereString);
        assert_eq!(cmd.redirects[0].target, "hello");
    }

    #[test]
    fn process_substitution_argument_is_tagged() {
        let (cmd, errors) = parse("diff <(a) <(b)");
        assert!(errors.is_empty());
        let cmd = simple(&cmd.unwrap()).clone();
        assert_eq!(cmd.args.len(), 3);
        assert!(cmd.args[1].is_process_sub());
        assert!(cmd.args[2].is_process_sub());
    }

    #[test]
    fn subshell_wraps_inner_sequence() {
        let (cmd, errors) = parse("(a; b)");
        assert!(errors.is_empty());
        let Command::Subshell { body } = cmd.unwrap() else {
            panic!("expected a subshell");
        };
        assert_matches!(*body, Command::Sequence { .. });
    }

    #[test]
    fn unmatched_rparen_records_an_error() {
        let (cmd, errors) = parse("(a");
        assert!(!errors.is_empty());
        assert_matches!(errors[0], ParseError::UnclosedSubshell { .. });
        // The parser still hands back the prefix it managed to build.
        assert!(cmd.is_some());
    }

    #[test]
    fn missing_redirection_target_is_reported() {
        let (cmd, errors) = parse("echo hi >");
        assert_matches!(errors.as_slice(), [ParseError::MissingRedirectionTarget { .. }]);
        assert!(cmd.is_some());
    }

    #[test]
    fn first_word_alias_is_expanded_once() {
        let mut aliases = AliasTable::new();
        aliases.insert("ll".to_owned(), "ls -l".to_owned(), Location::dummy());
        let mut host = NullHost;
        let (cmd, errors) = parse_line(
            "ll /tmp",
            Source::CommandLine,
            Some(&aliases),
            ParserOptions::default(),
            &mut host,
        );
        assert!(errors.is_empty());
        let cmd = simple(&cmd.unwrap()).clone();
        assert_eq!(words(&cmd), vec!["ls", "-l", "/tmp"]);
    }

    #[test]
    fn cyclic_alias_expands_exactly_once() {
        let mut aliases = AliasTable::new();
        aliases.insert("x".to_owned(), "x y".to_owned(), Location::dummy());
        let mut host = NullHost;
        let (cmd, errors) = parse_line(
            "x",
            Source::CommandLine,
            Some(&aliases),
            ParserOptions::default(),
            &mut host,
        );
        assert!(errors.is_empty());
        let cmd = simple(&cmd.unwrap()).clone();
        // The replacement's own first word ("x") is not re-expanded, so the
        // alias body is taken literally, not resolved recursively.
        assert_eq!(words(&cmd), vec!["x", "y"]);
    }

    #[test]
    fn disabled_pipes_collapse_to_left_command() {
        let mut host = NullHost;
        let options = ParserOptions {
            pipes: false,
            ..ParserOptions::default()
        };
        let (cmd, errors) = parse_line("a | b", Source::CommandLine, None, options, &mut host);
        assert!(errors.is_empty());
        assert_matches!(cmd.unwrap(), Command::Simple(_));
    }

    #[test]
    fn disabled_sequences_keep_only_the_rightmost_item() {
        let mut host = NullHost;
        let options = ParserOptions {
            sequences: false,
            ..ParserOptions::default()
        };
        let (cmd, errors) = parse_line("a;b", Source::CommandLine, None, options, &mut host);
        assert!(errors.is_empty());
        let cmd = simple(&cmd.unwrap()).clone();
        assert_eq!(words(&cmd), vec!["b"]);
    }
}
