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

//! Thin wrappers around the handful of POSIX syscalls the executor needs:
//! `fork`, `pipe`, `dup2`, `execve`, `waitpid`, and terminal process-group
//! control.
//!
//! These are direct `nix` calls rather than routed through an abstracted,
//! swappable `System` trait: tidesh commits to a single-threaded,
//! directly-blocking process model with no async executor, so there is no
//! virtual system to swap in for tests here, and no other caller needs the
//! indirection.

use std::ffi::CString;
use std::path::Path;

pub use nix::sys::wait::WaitStatus;
pub use nix::unistd::{ForkResult, Pid};

/// Creates a child process. Safety and semantics match `nix::unistd::fork`:
/// the caller must avoid doing anything beyond async-signal-safe operations
/// between the fork and the next `exec`/`exit` in the child.
///
/// # Safety
///
/// Must not be called while any other thread might be holding a lock this
/// process depends on; tidesh is single-threaded so this is always safe to
/// call from the executor.
pub unsafe fn fork() -> nix::Result<ForkResult> {
    unsafe { nix::unistd::fork() }
}

/// Creates a pipe, returning `(read_fd, write_fd)`.
pub fn pipe() -> nix::Result<(std::os::fd::OwnedFd, std::os::fd::OwnedFd)> {
    nix::unistd::pipe()
}

/// Duplicates `from` onto `to`, closing `to` first if already open.
pub fn dup2(from: std::os::fd::RawFd, to: std::os::fd::RawFd) -> nix::Result<()> {
    // SAFETY: `to` is a plain fd number the caller owns; `dup2` closes it
    // if necessary before aliasing `from` onto it.
    unsafe { nix::unistd::dup2(from, to) }?;
    Ok(())
}

/// Closes a raw file descriptor. Never panics; a double-close is silently
/// ignored, matching the forgiving `close(2)`-wrapping behavior of shells
/// that don't track fd ownership precisely across fork boundaries.
pub fn close(fd: std::os::fd::RawFd) {
    let _ = nix::unistd::close(fd);
}

/// Replaces the calling process's image. Only returns on failure.
pub fn execve(path: &Path, argv: &[String], envp: &[String]) -> nix::Error {
    let Ok(path) = CString::new(path.as_os_str().as_encoded_bytes()) else {
        return nix::Error::EILSEQ;
    };
    let Ok(argv): Result<Vec<CString>, _> = argv.iter().map(|a| CString::new(a.as_str())).collect()
    else {
        return nix::Error::EILSEQ;
    };
    let Ok(envp): Result<Vec<CString>, _> = envp.iter().map(|a| CString::new(a.as_str())).collect()
    else {
        return nix::Error::EILSEQ;
    };
    match nix::unistd::execve(&path, &argv, &envp) {
        Ok(infallible) => match infallible {},
        Err(e) => e,
    }
}

/// Waits for a specific pid to change state, mirroring
/// `waitpid(pid, &status, WUNTRACED | WCONTINUED)` with no `WNOHANG`.
pub fn waitpid_blocking(pid: Pid) -> nix::Result<WaitStatus> {
    nix::sys::wait::waitpid(
        pid,
        Some(nix::sys::wait::WaitPidFlag::WUNTRACED | nix::sys::wait::WaitPidFlag::WCONTINUED),
    )
}

/// Polls a specific pid for a state change without blocking, used by the
/// entry loop's job-table sweep.
pub fn waitpid_nohang(pid: Pid) -> nix::Result<WaitStatus> {
    nix::sys::wait::waitpid(
        pid,
        Some(
            nix::sys::wait::WaitPidFlag::WNOHANG
                | nix::sys::wait::WaitPidFlag::WUNTRACED
                | nix::sys::wait::WaitPidFlag::WCONTINUED,
        ),
    )
}

#[must_use]
pub fn getpid() -> i32 {
    nix::unistd::getpid().as_raw()
}

#[must_use]
pub fn getpgrp() -> i32 {
    nix::unistd::getpgrp().as_raw()
}

/// Puts `pid` into process group `pgid`, creating a new group if
/// `pgid == pid`. Used both by the shell at startup (to own its own group)
/// and by the executor when launching a new pipeline.
pub fn setpgid(pid: i32, pgid: i32) -> nix::Result<()> {
    nix::unistd::setpgid(Pid::from_raw(pid), Pid::from_raw(pgid))
}

/// Gives the controlling terminal to process group `pgid`. A no-op (and not
/// an error) if fd 0 is not a terminal, so running under `--eval`/script
/// redirection never fails here.
pub fn tcsetpgrp_stdin(pgid: i32) {
    use std::os::fd::BorrowedFd;
    // SAFETY: fd 0 is always a valid (if not necessarily a tty) descriptor
    // for the lifetime of this call.
    let stdin = unsafe { BorrowedFd::borrow_raw(0) };
    let _ = nix::unistd::tcsetpgrp(stdin, Pid::from_raw(pgid));
}

/// Sends `SIGCONT` to `pid`, resuming it if it is currently stopped.
/// Used by the `fg`/`bg` builtins; a no-op error for a pid that has
/// already exited.
pub fn send_sigcont(pid: i32) -> nix::Result<()> {
    nix::sys::signal::kill(Pid::from_raw(pid), nix::sys::signal::Signal::SIGCONT)
}

pub fn exit_status_of(status: WaitStatus) -> Option<i32> {
    match status {
        WaitStatus::Exited(_, code) => Some(code),
        WaitStatus::Signaled(_, sig, _) => Some(128 + sig as i32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    #[test]
    fn pipe_roundtrips_bytes() {
        let (read_fd, write_fd) = pipe().unwrap();
        let mut writer = std::fs::File::from(write_fd);
        writer.write_all(b"hi").unwrap();
        drop(writer);
        let mut reader = std::fs::File::from(read_fd);
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"hi");
    }

    #[test]
    fn fork_and_wait_reports_exit_status() {
        // SAFETY: single-threaded test process; the child only calls
        // `std::process::exit`.
        match unsafe { fork() }.unwrap() {
            ForkResult::Child => std::process::exit(42),
            ForkResult::Parent { child } => {
                let status = waitpid_blocking(child).unwrap();
                assert_eq!(exit_status_of(status), Some(42));
            }
        }
    }

    #[test]
    fn getpid_matches_the_running_process() {
        assert_eq!(getpid(), std::process::id() as i32);
    }
}
