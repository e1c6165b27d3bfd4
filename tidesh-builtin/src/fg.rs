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

//! The `fg` built-in: resumes a stopped job (or a still-running
//! background one) in the foreground, handing it the controlling
//! terminal for the duration and blocking until it stops or exits.

use tidesh_env::builtin::ExecResult;
use tidesh_env::job::JobState;
use tidesh_env::system;
use tidesh_env::Env;

use crate::common::resolve_job_spec;

pub fn main(env: &mut Env, args: Vec<String>) -> ExecResult {
    let spec = args.first().map(String::as_str);
    let Some(id) = resolve_job_spec(env, spec) else {
        eprintln!("tidesh: fg: no such job");
        return ExecResult::new(1);
    };
    let Some(job) = env.jobs.get(id) else {
        eprintln!("tidesh: fg: no such job");
        return ExecResult::new(1);
    };
    let pid = job.pid;
    println!("{}", job.command_text);

    if job.state == JobState::Stopped {
        let _ = system::send_sigcont(pid);
    }
    system::tcsetpgrp_stdin(pid);
    let status = tidesh_semantics::exec::jobs::wait_foreground(env, id);
    system::tcsetpgrp_stdin(env.shell_pgid);
    ExecResult::new(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn no_jobs_is_an_error() {
        let (mut env, _guard) = fixture_env();
        let result = main(&mut env, vec![]);
        assert_eq!(result.exit_status, 1);
    }

    #[test]
    fn unknown_job_spec_is_an_error() {
        let (mut env, _guard) = fixture_env();
        let result = main(&mut env, vec!["%9".into()]);
        assert_eq!(result.exit_status, 1);
    }
}
