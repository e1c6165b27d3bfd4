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

//! The `wait` built-in: blocks until the named jobs (or, with no
//! operands, every tracked job) finish, returning the last one's exit
//! status.

use tidesh_env::builtin::ExecResult;
use tidesh_env::Env;

use crate::common::resolve_job_spec;

pub fn main(env: &mut Env, args: Vec<String>) -> ExecResult {
    let ids: Vec<u32> = if args.is_empty() {
        env.jobs.iter().map(|(id, _)| id).collect()
    } else {
        let mut ids = Vec::with_capacity(args.len());
        for arg in &args {
            match resolve_job_spec(env, Some(arg)) {
                Some(id) => ids.push(id),
                None => {
                    eprintln!("tidesh: wait: {arg}: no such job");
                    return ExecResult::new(127);
                }
            }
        }
        ids
    };

    let mut status = 0;
    for id in ids {
        status = tidesh_semantics::exec::jobs::wait_foreground(env, id);
    }
    ExecResult::new(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn no_jobs_succeeds_trivially() {
        let (mut env, _guard) = fixture_env();
        let result = main(&mut env, vec![]);
        assert_eq!(result.exit_status, 0);
    }

    #[test]
    fn unknown_job_spec_is_an_error() {
        let (mut env, _guard) = fixture_env();
        let result = main(&mut env, vec!["%9".into()]);
        assert_eq!(result.exit_status, 127);
    }
}
