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

//! The `bg` built-in: resumes one or more stopped jobs, leaving each
//! running in the background.

use tidesh_env::builtin::ExecResult;
use tidesh_env::job::JobState;
use tidesh_env::system;
use tidesh_env::Env;

use crate::common::resolve_job_spec;

pub fn main(env: &mut Env, args: Vec<String>) -> ExecResult {
    let specs: Vec<Option<String>> = if args.is_empty() {
        vec![None]
    } else {
        args.into_iter().map(Some).collect()
    };

    let mut status = 0;
    for spec in specs {
        let Some(id) = resolve_job_spec(env, spec.as_deref()) else {
            eprintln!("tidesh: bg: no such job");
            status = 1;
            continue;
        };
        let Some(job) = env.jobs.get_mut(id) else {
            eprintln!("tidesh: bg: no such job");
            status = 1;
            continue;
        };
        let pid = job.pid;
        job.state = JobState::Running;
        println!("[{id}] {} &", job.command_text);
        let _ = system::send_sigcont(pid);
    }
    ExecResult::new(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn resumes_stopped_job_in_background() {
        let (mut env, _guard) = fixture_env();
        let id = env.jobs.add(std::process::id() as i32, "sleep 5".into(), JobState::Stopped);
        let result = main(&mut env, vec![id.to_string()]);
        assert_eq!(result.exit_status, 0);
        assert_eq!(env.jobs.get(id).unwrap().state, JobState::Running);
    }

    #[test]
    fn unknown_job_reports_failure() {
        let (mut env, _guard) = fixture_env();
        let result = main(&mut env, vec!["%9".into()]);
        assert_eq!(result.exit_status, 1);
    }
}
