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

//! Shell language semantics: the expansion pipeline and the executor.
//!
//! These two subsystems are the tightly coupled heart of the shell. The
//! lexer in `tidesh-syntax` calls back into [`exec::execute_string_stdout`]
//! for `$(…)` substitution (wired up through [`lexer_host::ExecutingHost`]),
//! and the executor calls back into the expansion pipeline for every
//! argument of every simple command it runs. Neither direction is a global:
//! both travel through a `&mut `[`tidesh_env::Env`]` that the caller already
//! owns.

pub mod expand;
pub mod exec;
pub mod hooks;
pub mod lexer_host;

pub use exec::{execute, execute_string, execute_string_stdout};
pub use lexer_host::ExecutingHost;
