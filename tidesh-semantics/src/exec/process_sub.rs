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

//! Process substitution: `<(cmd)` and `>(cmd)`. Both forms open a pipe and
//! fork a grand-child that runs `cmd` with one end wired to its stdin or
//! stdout; the other end is handed back to the caller, either as a raw fd
//! to `dup2` onto a redirection target, or as a `/dev/fd/N` path to splice
//! into an argument list.

use std::os::fd::{AsRawFd, IntoRawFd, RawFd};
use tidesh_env::system::{self, ForkResult};
use tidesh_env::Env;
use tidesh_syntax::source::Source;
use tidesh_syntax::syntax::RedirectionKind;

/// Spawns `inner` connected through a fresh pipe and returns the fd the
/// calling process keeps: for `RedirectionKind::In` (`<(inner)`), the read
/// end, with `inner`'s stdout on the write end; for `RedirectionKind::Out`
/// (`>(inner)`), the write end, with `inner`'s stdin on the read end.
///
/// The returned fd is intentionally leaked (not wrapped in an `OwnedFd`):
/// the caller is always a process on its way to either `dup2`-ing it into
/// place and closing it, or `execve`/`exit`ing shortly after, so there is
/// no later point at which Rust-level `Drop` bookkeeping would help.
pub fn connect_fd(inner: &str, kind: RedirectionKind, env: &mut Env) -> Option<RawFd> {
    let (read_fd, write_fd) = system::pipe().ok()?;

    // SAFETY: single-threaded process; the grand-child only wires a
    // descriptor and execs/runs the interpreter before exiting.
    match unsafe { system::fork() }.ok()? {
        ForkResult::Child => {
            match kind {
                RedirectionKind::In => {
                    drop(read_fd);
                    let _ = system::dup2(write_fd.as_raw_fd(), 1);
                }
                _ => {
                    drop(write_fd);
                    let _ = system::dup2(read_fd.as_raw_fd(), 0);
                }
            }
            let status = crate::exec::execute_string_no_history(
                env,
                inner,
                Source::CommandSubstitution,
            );
            std::process::exit(status);
        }
        ForkResult::Parent { .. } => match kind {
            RedirectionKind::In => {
                drop(write_fd);
                Some(read_fd.into_raw_fd())
            }
            _ => {
                drop(read_fd);
                Some(write_fd.into_raw_fd())
            }
        },
    }
}

/// Connects `inner` and returns a `/dev/fd/N` path referencing the kept
/// end, for splicing into an argument vector (`diff <(a) <(b)`).
pub fn substitute_path(inner: &str, kind: RedirectionKind, env: &mut Env) -> Option<String> {
    let fd = connect_fd(inner, kind, env)?;
    Some(format!("/dev/fd/{fd}"))
}

#[cfg(test)]
mod tests {
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn process_substitution_in_is_readable_by_the_consumer() {
        let (mut env, _guard) = fixture_env();
        let out = crate::exec::execute_string_stdout(&mut env, "cat <(echo hi)");
        assert_eq!(out, "hi\n");
    }

    #[test]
    fn process_substitution_out_receives_what_the_consumer_writes() {
        let (mut env, _guard) = fixture_env();
        let path = env.cwd.join("captured.txt");
        let status = crate::exec::execute_string(
            &mut env,
            &format!("echo hi > >(cat > {})", path.display()),
            tidesh_syntax::source::Source::CommandLine,
        );
        assert_eq!(status, 0);
        // The grand-child consuming the write end runs concurrently with no
        // ordering guarantee relative to the parent's return, so give it a
        // moment to finish writing before asserting on its output.
        std::thread::sleep(std::time::Duration::from_millis(200));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hi\n");
    }
}
