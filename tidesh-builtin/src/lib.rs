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

//! Implementations of tidesh's built-in utilities, and the table that
//! wires their names into a fresh [`tidesh_env::Env`].
//!
//! `echo` is deliberately not among them: tidesh leans on whatever `echo`
//! is found on `$PATH` rather than shipping its own, since implementations
//! rarely agree on flag handling and shadowing a well-known external only
//! invites surprise.

pub mod alias;
pub mod bg;
pub mod cd;
pub mod colon;
pub mod common;
pub mod eval;
pub mod exit;
pub mod export;
pub mod r#false;
pub mod fg;
pub mod history;
pub mod info;
pub mod jobs;
pub mod popd;
pub mod pushd;
pub mod pwd;
pub mod read;
pub mod source;
pub mod terminal;
pub mod r#true;
pub mod r#type;
pub mod unalias;
pub mod wait;

use tidesh_env::builtin::{Builtin, Type};
use tidesh_env::Env;

/// Registers every built-in utility tidesh ships, in [`Env::builtins`].
/// Called once by whoever assembles a shell session (`tidesh-cli`'s
/// `main`, or a test fixture that wants the full catalogue).
pub fn register_all(env: &mut Env) {
    let specials: &[(&str, tidesh_env::builtin::Main)] = &[
        ("cd", cd::main),
        ("exit", exit::main),
        ("export", export::main),
        ("eval", eval::main),
        ("alias", alias::main),
        ("unalias", unalias::main),
        (".", source::main),
        ("source", source::main),
        ("pushd", pushd::main),
        ("popd", popd::main),
        ("history", history::main),
        ("terminal", terminal::main),
        ("info", info::main),
        ("type", r#type::main),
    ];
    for (name, execute) in specials {
        env.register_builtin(name, Builtin::new(Type::Special, *execute));
    }

    let job_control: &[(&str, tidesh_env::builtin::Main)] =
        &[("fg", fg::main), ("bg", bg::main), ("jobs", jobs::main)];
    for (name, execute) in job_control {
        env.register_builtin(name, Builtin::new(Type::JobControl, *execute));
    }

    let regular: &[(&str, tidesh_env::builtin::Main)] = &[
        ("true", r#true::main),
        ("false", r#false::main),
        (":", colon::main),
        ("pwd", pwd::main),
        ("read", read::main),
        ("wait", wait::main),
    ];
    for (name, execute) in regular {
        env.register_builtin(name, Builtin::new(Type::Regular, *execute));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED: &[&str] = &[
        "cd", "exit", "export", "eval", "alias", "unalias", ".", "source", "pushd", "popd",
        "history", "terminal", "info", "type", "fg", "bg", "jobs", "true", "false", ":", "pwd",
        "read", "wait",
    ];

    #[test]
    fn every_catalogued_name_is_registered() {
        let mut env = Env::new();
        register_all(&mut env);
        for name in EXPECTED {
            assert!(env.builtin(name).is_some(), "{name} was not registered");
        }
    }
}
