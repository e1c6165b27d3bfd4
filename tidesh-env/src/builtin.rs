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

//! Type definitions for built-in utilities.
//!
//! Concrete implementations (`cd`, `export`, `fg`, ...) are not in this
//! crate; see `tidesh-builtin`. This module only fixes the *shape* of a
//! builtin and the table `Env` looks them up in, so `tidesh-env` doesn't
//! need to depend on `tidesh-builtin` (which itself depends on
//! `tidesh-semantics`, which depends on `tidesh-env` — putting the table
//! here breaks that cycle rather than growing it).

use crate::Env;

/// Whether a builtin must run in the shell process or may be forked like
/// an external command.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Type {
    /// Mutates shell state (`cd`, `export`, `exit`, ...); never forked.
    Special,
    /// Mutates the job table and terminal ownership (`fg`, `bg`, `jobs`);
    /// never forked, for the same reason as `Special`.
    JobControl,
    /// May run either in-process or forked; forked when invoked as part
    /// of a pipeline or background job so its stdout/stdin participate
    /// like any other command.
    Regular,
}

/// Outcome of running a builtin.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExecResult {
    pub exit_status: i32,
    /// Set by `exit`: the whole shell process should terminate with this
    /// status once the builtin returns, rather than just this command.
    pub exit_shell: Option<i32>,
}

impl ExecResult {
    #[must_use]
    pub const fn new(exit_status: i32) -> Self {
        ExecResult {
            exit_status,
            exit_shell: None,
        }
    }

    #[must_use]
    pub const fn exit(status: i32) -> Self {
        ExecResult {
            exit_status: status,
            exit_shell: Some(status),
        }
    }
}

impl From<i32> for ExecResult {
    fn from(status: i32) -> Self {
        ExecResult::new(status)
    }
}

/// The function signature every builtin implements: the live session and
/// the argument vector (not including the command name itself).
pub type Main = fn(&mut Env, Vec<String>) -> ExecResult;

/// A registered builtin: its dispatch category plus the function that
/// implements it.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub r#type: Type,
    pub execute: Main,
}

impl Builtin {
    #[must_use]
    pub const fn new(r#type: Type, execute: Main) -> Self {
        Builtin { r#type, execute }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_result_does_not_request_shell_exit() {
        let r = ExecResult::new(2);
        assert_eq!(r.exit_status, 2);
        assert_eq!(r.exit_shell, None);
    }

    #[test]
    fn exit_result_requests_shell_exit_with_the_same_status() {
        let r = ExecResult::exit(7);
        assert_eq!(r.exit_status, 7);
        assert_eq!(r.exit_shell, Some(7));
    }

    #[test]
    fn from_i32_is_equivalent_to_new() {
        let r: ExecResult = 5.into();
        assert_eq!(r, ExecResult::new(5));
    }
}
