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

//! Pipelines, subshells, and backgrounded (`&`) commands: the three
//! `Command` variants whose execution means forking at least one more
//! process than a bare [`SimpleCommand`] does.

use std::os::fd::AsRawFd;
use tidesh_env::job::JobState;
use tidesh_env::system::{self, ForkResult};
use tidesh_env::Env;
use tidesh_syntax::syntax::Command;

/// Runs `left | right`. Both sides get their own process group (seeded by
/// `left`'s pid) so job control can stop or foreground the whole pipeline
/// at once; the shell waits for both and reports `right`'s exit status.
pub fn execute_pipe(left: &Command, right: &Command, env: &mut Env) -> i32 {
    let Ok((read_fd, write_fd)) = system::pipe() else {
        eprintln!("tidesh: pipe: unable to create pipe");
        return 1;
    };

    // SAFETY: single-threaded process; each child only wires descriptors
    // and calls back into `execute`/`exit`, nothing else, before exiting.
    let left_pid = match unsafe { system::fork() } {
        Ok(ForkResult::Child) => {
            let _ = system::dup2(write_fd.as_raw_fd(), 1);
            drop(write_fd);
            drop(read_fd);
            let _ = system::setpgid(0, 0);
            let status = super::execute(left, env);
            std::process::exit(status);
        }
        Ok(ForkResult::Parent { child }) => child.as_raw(),
        Err(e) => {
            eprintln!("tidesh: fork: {e}");
            return 1;
        }
    };
    let _ = system::setpgid(left_pid, left_pid);

    let right_pid = match unsafe { system::fork() } {
        Ok(ForkResult::Child) => {
            let _ = system::dup2(read_fd.as_raw_fd(), 0);
            drop(read_fd);
            drop(write_fd);
            let _ = system::setpgid(0, left_pid);
            let status = super::execute(right, env);
            std::process::exit(status);
        }
        Ok(ForkResult::Parent { child }) => child.as_raw(),
        Err(e) => {
            eprintln!("tidesh: fork: {e}");
            drop(read_fd);
            drop(write_fd);
            let _ = system::waitpid_blocking(nix::unistd::Pid::from_raw(left_pid));
            return 1;
        }
    };
    let _ = system::setpgid(right_pid, left_pid);

    drop(read_fd);
    drop(write_fd);

    let foreground = !super::is_background();
    if foreground {
        system::tcsetpgrp_stdin(left_pid);
    }

    let left_status = wait_for(left_pid);
    let right_status = wait_for(right_pid);

    if foreground {
        system::tcsetpgrp_stdin(env.jobs.shell_pgid);
    }

    let _ = left_status;
    right_status
}

/// Runs `body` in a forked child, with no further isolation than the
/// process boundary itself (working directory, assignments, and file
/// descriptors made inside `body` don't leak back to the parent).
pub fn execute_subshell(body: &Command, env: &mut Env) -> i32 {
    // SAFETY: single-threaded process.
    match unsafe { system::fork() } {
        Ok(ForkResult::Child) => {
            let status = super::execute(body, env);
            std::process::exit(status);
        }
        Ok(ForkResult::Parent { child }) => wait_for(child.as_raw()),
        Err(e) => {
            eprintln!("tidesh: fork: {e}");
            1
        }
    }
}

/// Runs `body` in the background: forks, registers the child as a new
/// job, prints `[id] pid`, sets `$!`, and returns `0` immediately without
/// waiting.
pub fn execute_async(body: &Command, env: &mut Env) -> i32 {
    // SAFETY: single-threaded process.
    match unsafe { system::fork() } {
        Ok(ForkResult::Child) => {
            let _ = system::setpgid(0, 0);
            super::mark_background();
            let status = super::execute(body, env);
            std::process::exit(status);
        }
        Ok(ForkResult::Parent { child }) => {
            let pid = child.as_raw();
            let _ = system::setpgid(pid, pid);
            let command_text = body.to_string();
            let id = env.jobs.add(pid, command_text, JobState::Running);
            println!("[{id}] {pid}");
            env.environment.set_background_pid(pid);
            0
        }
        Err(e) => {
            eprintln!("tidesh: fork: {e}");
            1
        }
    }
}

pub(super) fn wait_for(pid: i32) -> i32 {
    use nix::sys::wait::WaitStatus;
    loop {
        match system::waitpid_blocking(nix::unistd::Pid::from_raw(pid)) {
            Ok(WaitStatus::Stopped(..)) | Ok(WaitStatus::Continued(_)) => continue,
            Ok(status) => return system::exit_status_of(status).unwrap_or(1),
            Err(_) => return 1,
        }
    }
}
