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

//! Command language front end: lexer, abstract syntax tree and parser.
//!
//! This crate has no knowledge of the host operating system. It turns a byte
//! string into tokens ([`lexer`]), tokens into an [`syntax`] tree, with alias
//! substitution folded into the parse ([`parser`]). Anything that requires
//! running a process — most notably `$(…)` command substitution — is
//! delegated back to the caller through the [`lexer::LexerHost`] trait so
//! that this crate never has to know how commands are executed.

pub mod alias;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod syntax;
