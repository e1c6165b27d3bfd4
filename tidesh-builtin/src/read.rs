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

//! The `read` built-in: reads one line from stdin and splits it on
//! whitespace into the named variables, with the last variable
//! absorbing any leftover fields.

use std::io::BufRead;
use tidesh_env::builtin::ExecResult;
use tidesh_env::Env;

pub fn main(env: &mut Env, args: Vec<String>) -> ExecResult {
    if args.is_empty() {
        eprintln!("tidesh: read: missing operand");
        return ExecResult::new(2);
    }

    let mut line = String::new();
    let n = match std::io::stdin().lock().read_line(&mut line) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("tidesh: read: {e}");
            return ExecResult::new(1);
        }
    };
    if n == 0 {
        for name in &args {
            env.environment.set(name, "");
        }
        return ExecResult::new(1);
    }
    let line = line.trim_end_matches('\n');

    let mut fields = line.split_whitespace();
    let (last, rest) = args.split_last().expect("checked non-empty above");
    for name in rest {
        env.environment.set(name, fields.next().unwrap_or(""));
    }
    let remainder: Vec<&str> = fields.collect();
    env.environment.set(last, remainder.join(" "));

    ExecResult::new(0)
}
