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

//! The `jobs` built-in: polls the job table for state changes, then
//! lists every remaining entry.

use tidesh_env::builtin::ExecResult;
use tidesh_env::Env;

pub fn main(env: &mut Env, _args: Vec<String>) -> ExecResult {
    tidesh_semantics::exec::jobs::poll(env);

    let current = env.jobs.current_id();
    let previous = env.jobs.previous_id();
    for (id, job) in env.jobs.iter() {
        let marker = if Some(id) == current {
            "+"
        } else if Some(id) == previous {
            "-"
        } else {
            " "
        };
        println!("[{id}]{marker}\t{}\t\t{}", job.state, job.command_text);
    }
    ExecResult::new(0)
}
