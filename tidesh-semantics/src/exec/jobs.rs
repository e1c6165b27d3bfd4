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

//! Non-blocking job-table maintenance: polling every tracked pid for a
//! state change and printing the `[id]+  Done     command` style
//! notifications, the way the entry loop does between prompts and the
//! `wait`/`jobs` builtins do on demand.

use nix::sys::wait::WaitStatus;
use nix::unistd::Pid;
use tidesh_env::job::JobState;
use tidesh_env::{system, Env};

/// Polls every job's pid with `WNOHANG`, updates its recorded state, and
/// prints a notification the first time it's observed `Done` or `Killed`.
/// Jobs are removed from the table once notified, matching the "announce
/// once, then forget" convention most shells use for completed jobs.
pub fn poll(env: &mut Env) {
    let ids: Vec<u32> = env.jobs.iter().map(|(id, _)| id).collect();
    let mut to_notify = Vec::new();

    for id in ids {
        let Some(job) = env.jobs.get_mut(id) else {
            continue;
        };
        if matches!(job.state, JobState::Done | JobState::Killed) {
            continue;
        }

        match system::waitpid_nohang(Pid::from_raw(job.pid)) {
            Ok(WaitStatus::Exited(_, code)) => {
                job.state = JobState::Done;
                job.exit_status = code;
            }
            Ok(WaitStatus::Signaled(_, sig, _)) => {
                job.state = JobState::Killed;
                job.exit_status = 128 + sig as i32;
            }
            Ok(WaitStatus::Stopped(..)) => job.state = JobState::Stopped,
            Ok(WaitStatus::Continued(_)) => job.state = JobState::Running,
            _ => continue,
        }

        if !job.notified {
            job.notified = true;
            to_notify.push(id);
        }
    }

    let current = env.jobs.current_id();
    let previous = env.jobs.previous_id();
    for id in &to_notify {
        if let Some(job) = env.jobs.get(*id) {
            let marker = if Some(*id) == current {
                "+"
            } else if Some(*id) == previous {
                "-"
            } else {
                " "
            };
            println!("[{id}]{marker}\t{}\t\t{}", job.state, job.command_text);
        }
    }

    for id in to_notify {
        if let Some(job) = env.jobs.get(id) {
            if matches!(job.state, JobState::Done | JobState::Killed) {
                env.jobs.remove(id);
            }
        }
    }
}

/// Blocks until job `id`'s process exits, is killed, or stops again,
/// updating the job table accordingly. Returns the resulting exit status
/// (128+signal for a stop, matching the convention the rest of the
/// executor uses for signal-caused termination). Used by `fg` (which also
/// owns handing the job the controlling terminal around this call) and
/// `wait`.
pub fn wait_foreground(env: &mut Env, id: u32) -> i32 {
    let Some(pid) = env.jobs.get(id).map(|j| j.pid) else {
        return 127;
    };
    loop {
        match system::waitpid_blocking(Pid::from_raw(pid)) {
            Ok(WaitStatus::Exited(_, code)) => {
                env.jobs.remove(id);
                return code;
            }
            Ok(WaitStatus::Signaled(_, sig, _)) => {
                env.jobs.remove(id);
                return 128 + sig as i32;
            }
            Ok(WaitStatus::Stopped(_, sig)) => {
                if let Some(job) = env.jobs.get_mut(id) {
                    job.state = JobState::Stopped;
                }
                return 128 + sig as i32;
            }
            Ok(WaitStatus::Continued(_)) => continue,
            Err(_) => {
                env.jobs.remove(id);
                return 1;
            }
            _ => continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    /// Forks a real `true`/`false`-equivalent child by running `sh -c
    /// <code>` and registers it as a RUNNING job, the same shape
    /// `compound::execute_async` leaves in the job table for a `&` command.
    fn spawn_job(env: &mut Env, shell_code: &str) -> u32 {
        let status = crate::exec::execute_string(
            env,
            &format!("sh -c '{shell_code}' &"),
            tidesh_syntax::source::Source::CommandLine,
        );
        assert_eq!(status, 0);
        env.jobs.current_id().expect("background job should be registered")
    }

    #[test]
    fn poll_marks_an_exited_job_done_and_removes_it_once_notified() {
        let (mut env, _guard) = fixture_env();
        let id = spawn_job(&mut env, "exit 0");
        // Give the child a moment to actually exit before polling: `poll`
        // uses WNOHANG, so it is allowed to observe "still running" if
        // called too early.
        std::thread::sleep(std::time::Duration::from_millis(300));
        poll(&mut env);
        assert!(env.jobs.get(id).is_none(), "a notified Done job is removed from the table");
    }

    #[test]
    fn wait_foreground_blocks_until_the_job_exits() {
        let (mut env, _guard) = fixture_env();
        let id = spawn_job(&mut env, "exit 3");
        let status = wait_foreground(&mut env, id);
        assert_eq!(status, 3);
        assert!(env.jobs.get(id).is_none());
    }

    #[test]
    fn wait_foreground_on_unknown_job_returns_127() {
        let (mut env, _guard) = fixture_env();
        assert_eq!(wait_foreground(&mut env, 999), 127);
    }
}
