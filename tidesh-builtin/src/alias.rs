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

//! The `alias` built-in.
//!
//! `alias` with no operands lists every definition; `alias name` prints
//! one definition; `alias name=replacement` defines or redefines one.
//! Each form prints through `tidesh_quote::quote`, so the output can be
//! fed straight back into the shell.

use tidesh_env::builtin::ExecResult;
use tidesh_env::Env;
use tidesh_quote::quote;
use tidesh_syntax::source::Location;

pub fn main(env: &mut Env, args: Vec<String>) -> ExecResult {
    if args.is_empty() {
        let mut all: Vec<_> = env.aliases.iter().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        for alias in all {
            println!("alias {}={}", alias.name, quote(&alias.replacement));
        }
        return ExecResult::new(0);
    }

    let mut status = 0;
    for arg in &args {
        match arg.split_once('=') {
            Some((name, replacement)) => {
                env.aliases
                    .insert(name.to_owned(), replacement.to_owned(), Location::dummy());
            }
            None => match env.aliases.get(arg) {
                Some(alias) => println!("alias {}={}", alias.name, quote(&alias.replacement)),
                None => {
                    eprintln!("tidesh: alias: {arg}: not found");
                    status = 1;
                }
            },
        }
    }
    ExecResult::new(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn defines_then_looks_up() {
        let (mut env, _guard) = fixture_env();
        main(&mut env, vec!["ll=ls -l".into()]);
        assert_eq!(env.aliases.get("ll").unwrap().replacement, "ls -l");
    }

    #[test]
    fn unknown_name_reports_failure() {
        let (mut env, _guard) = fixture_env();
        let result = main(&mut env, vec!["nope".into()]);
        assert_eq!(result.exit_status, 1);
    }
}
