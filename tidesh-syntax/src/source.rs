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

//! Where a piece of source text came from.
//!
//! Every diagnostic the parser emits names a [`Location`] so the user can see
//! which line of their input (or which rc/script file) a syntax error refers
//! to. This is deliberately much lighter than a full span-and-snippet system:
//! tidesh reports one diagnostic per error, not a rendered code frame.

use std::fmt;
use std::rc::Rc;

/// Where a piece of input text is coming from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Source {
    /// Interactive prompt or `-c`/`--eval` argument.
    CommandLine,
    /// A script or rc file read from disk.
    File { path: Rc<str> },
    /// Text produced by expanding an alias.
    Alias { name: Rc<str> },
    /// Text substituted into a word by `$(…)`.
    CommandSubstitution,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::CommandLine => write!(f, "command line"),
            Source::File { path } => write!(f, "{path}"),
            Source::Alias { name } => write!(f, "alias `{name}'"),
            Source::CommandSubstitution => write!(f, "command substitution"),
        }
    }
}

/// A one-based line and column position within a named [`Source`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Location {
    pub source: Rc<Source>,
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn dummy() -> Self {
        Location {
            source: Rc::new(Source::CommandLine),
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_display_is_line_colon_column() {
        let loc = Location {
            source: Rc::new(Source::File { path: "/etc/tideshrc".into() }),
            line: 3,
            column: 5,
        };
        assert_eq!(loc.to_string(), "/etc/tideshrc:3:5");
    }

    #[test]
    fn source_display_names_each_kind() {
        assert_eq!(Source::CommandLine.to_string(), "command line");
        assert_eq!(Source::Alias { name: "ll".into() }.to_string(), "alias `ll'");
        assert_eq!(Source::CommandSubstitution.to_string(), "command substitution");
    }

    #[test]
    fn dummy_location_is_line_one_column_one() {
        let loc = Location::dummy();
        assert_eq!(loc.line, 1);
        assert_eq!(loc.column, 1);
    }
}
