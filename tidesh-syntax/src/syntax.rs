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

//! Abstract syntax tree produced by the [parser](crate::parser).
//!
//! [`Command`] is the leaf of the tree; [`Pipe`], [`And`], [`Or`] and
//! [`Sequence`] are binary compounds built from it, and [`Command::Subshell`]
//! recurses back into a full [`Sequence`]. The tree is a plain sum type with
//! owned boxed children, not a pointer graph: ownership of a parsed command
//! line is unambiguous and it is dropped automatically once execution
//! finishes.

use crate::source::Location;
use std::fmt;

/// What kind of redirection operator introduced a [`Redirection`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RedirectionKind {
    /// `<`
    In,
    /// `>`
    Out,
    /// `>>`
    Append,
    /// `>&` or `<&` duplication onto another descriptor
    Dup,
    /// `<<` here-document
    HereDoc,
    /// `<<<` here-string
    HereString,
    /// `>&` that duplicates onto both the named descriptor and stderr
    /// (produced by the `&>`-style composite token)
    OutErr,
}

impl RedirectionKind {
    /// The file descriptor a redirection of this kind defaults to when the
    /// source carries no explicit `IO_NUMBER`.
    #[must_use]
    pub fn default_fd(self) -> u32 {
        use RedirectionKind::*;
        match self {
            In | Dup | HereDoc | HereString => 0,
            Out | Append | OutErr => 1,
        }
    }
}

/// One redirection attached to a [`Command`].
///
/// Redirections are pushed onto the front of a command's redirection list as
/// they are parsed (see [`Command::redirects`]), so applying them in the
/// order they appear in this `Vec` applies them in the *reverse* of their
/// order in the source text. This is a documented, testable property: `cmd
/// 2>&1 >out` and `cmd >out 2>&1` must wire up different descriptor tables.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Redirection {
    pub fd: u32,
    pub kind: RedirectionKind,
    pub target: String,
    /// Set when `target` is actually `<(…)` or `>(…)`: the executor resolves
    /// it to a `/dev/fd/N` path at fork time instead of expanding it as a
    /// word.
    pub is_process_sub: bool,
    pub location: Location,
}

/// A single word of a [`SimpleCommand`]'s argument vector, tagged with how
/// the executor should treat it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Arg {
    /// An ordinary word, subject to the full expansion pipeline.
    Word(String),
    /// `<(inner)`: replaced with a `/dev/fd/N` path reading from `inner`'s
    /// stdout.
    ProcessSubIn(String),
    /// `>(inner)`: replaced with a `/dev/fd/N` path feeding `inner`'s stdin.
    ProcessSubOut(String),
}

impl Arg {
    #[must_use]
    pub fn is_process_sub(&self) -> bool {
        !matches!(self, Arg::Word(_))
    }
}

/// `NAME=VALUE` appearing before the command word of a [`SimpleCommand`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assignment {
    pub name: String,
    pub value: String,
}

/// A simple command: an optional run of assignments, an argument vector and
/// any redirections, optionally run in the background.
///
/// At least one of `args`, `assignments` or `redirects` is non-empty; the
/// parser never produces an entirely empty `SimpleCommand`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SimpleCommand {
    pub assignments: Vec<Assignment>,
    pub args: Vec<Arg>,
    pub redirects: Vec<Redirection>,
}

impl SimpleCommand {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.args.is_empty() && self.redirects.is_empty()
    }
}

/// A node of the command tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    Simple(SimpleCommand),
    Pipe {
        left: Box<Command>,
        right: Box<Command>,
    },
    And {
        left: Box<Command>,
        right: Box<Command>,
    },
    Or {
        left: Box<Command>,
        right: Box<Command>,
    },
    Sequence {
        left: Box<Command>,
        right: Box<Command>,
    },
    Subshell {
        body: Box<Command>,
    },
    /// A trailing `&` on a [`sequence`](crate::parser) item. This wraps the
    /// whole sub-tree to its left: `a | b &` backgrounds the entire
    /// pipeline, not just `b`. Modeled as a thin wrapper node rather than a
    /// boolean field repeated on every variant, since the parser builds the
    /// tree bottom-up and only learns about a trailing `&` after the rest of
    /// the sub-tree already exists.
    Async {
        body: Box<Command>,
    },
}

impl Command {
    /// Whether this node is itself a `&`-suffixed background job.
    #[must_use]
    pub fn is_background(&self) -> bool {
        matches!(self, Command::Async { .. })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Simple(cmd) => {
                let mut first = true;
                for a in &cmd.assignments {
                    if !first {
                        write!(f, " ")?;
                    }
                    write!(f, "{}={}", a.name, a.value)?;
                    first = false;
                }
                for a in &cmd.args {
                    if !first {
                        write!(f, " ")?;
                    }
                    match a {
                        Arg::Word(w) => write!(f, "{w}")?,
                        Arg::ProcessSubIn(inner) => write!(f, "<({inner})")?,
                        Arg::ProcessSubOut(inner) => write!(f, ">({inner})")?,
                    }
                    first = false;
                }
                Ok(())
            }
            Command::Pipe { left, right } => write!(f, "{left} | {right}"),
            Command::And { left, right } => write!(f, "{left} && {right}"),
            Command::Or { left, right } => write!(f, "{left} || {right}"),
            Command::Sequence { left, right } => write!(f, "{left}; {right}"),
            Command::Subshell { body } => write!(f, "({body})"),
            Command::Async { body } => write!(f, "{body} &"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fd_matches_redirection_direction() {
        assert_eq!(RedirectionKind::In.default_fd(), 0);
        assert_eq!(RedirectionKind::HereDoc.default_fd(), 0);
        assert_eq!(RedirectionKind::HereString.default_fd(), 0);
        assert_eq!(RedirectionKind::Dup.default_fd(), 0);
        assert_eq!(RedirectionKind::Out.default_fd(), 1);
        assert_eq!(RedirectionKind::Append.default_fd(), 1);
        assert_eq!(RedirectionKind::OutErr.default_fd(), 1);
    }

    #[test]
    fn only_async_nodes_report_as_background() {
        let leaf = Command::Simple(SimpleCommand::default());
        assert!(!leaf.is_background());
        let wrapped = Command::Async { body: Box::new(leaf) };
        assert!(wrapped.is_background());
    }

    #[test]
    fn display_renders_a_pipeline_round_trip() {
        let cmd = Command::Pipe {
            left: Box::new(Command::Simple(SimpleCommand {
                args: vec![Arg::Word("echo".into()), Arg::Word("hi".into())],
                ..SimpleCommand::default()
            })),
            right: Box::new(Command::Simple(SimpleCommand {
                args: vec![Arg::Word("cat".into())],
                ..SimpleCommand::default()
            })),
        };
        assert_eq!(cmd.to_string(), "echo hi | cat");
    }

    #[test]
    fn display_renders_assignments_before_argv() {
        let cmd = Command::Simple(SimpleCommand {
            assignments: vec![Assignment {
                name: "FOO".into(),
                value: "bar".into(),
            }],
            args: vec![Arg::Word("echo".into())],
            ..SimpleCommand::default()
        });
        assert_eq!(cmd.to_string(), "FOO=bar echo");
    }
}
