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

//! Applies a command's redirections, in parsed order (the reverse of their
//! order in the source text — `cmd 2>&1 >out` and `cmd >out 2>&1` wire up
//! different descriptor tables, and this order is what makes that true).
//!
//! Only called after `fork`, in the child: every branch here either opens a
//! descriptor and `dup2`s it into place, or forks a small writer/reader
//! grand-child to feed a here-document, here-string, or process
//! substitution through a pipe.

use std::fs::OpenOptions;
use std::os::fd::AsRawFd;
use tidesh_env::system;
use tidesh_syntax::syntax::{Redirection, RedirectionKind};

use super::process_sub;

/// Applies every redirection in `redirects`. On the first failure, prints a
/// diagnostic and returns `Err(())`; the caller (always already in a
/// forked child) is expected to `exit(1)`.
pub fn apply_all(redirects: &[Redirection], env: &mut tidesh_env::Env) -> Result<(), ()> {
    for r in redirects {
        apply_one(r, env)?;
    }
    Ok(())
}

fn apply_one(r: &Redirection, env: &mut tidesh_env::Env) -> Result<(), ()> {
    if r.is_process_sub {
        let fd = process_sub::connect_fd(&r.target, r.kind, env).ok_or(())?;
        dup2_checked(fd, r.fd as i32, &r.target)?;
        return Ok(());
    }

    match r.kind {
        RedirectionKind::In => {
            let file = OpenOptions::new().read(true).open(&r.target).map_err(|e| {
                eprintln!("tidesh: {}: {e}", r.target);
            })?;
            dup2_checked(file.as_raw_fd(), r.fd as i32, &r.target)
        }
        RedirectionKind::Out => {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&r.target)
                .map_err(|e| eprintln!("tidesh: {}: {e}", r.target))?;
            dup2_checked(file.as_raw_fd(), r.fd as i32, &r.target)
        }
        RedirectionKind::Append => {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .append(true)
                .open(&r.target)
                .map_err(|e| eprintln!("tidesh: {}: {e}", r.target))?;
            dup2_checked(file.as_raw_fd(), r.fd as i32, &r.target)
        }
        RedirectionKind::OutErr => {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&r.target)
                .map_err(|e| eprintln!("tidesh: {}: {e}", r.target))?;
            dup2_checked(file.as_raw_fd(), r.fd as i32, &r.target)?;
            dup2_checked(file.as_raw_fd(), 2, &r.target)
        }
        RedirectionKind::Dup => apply_dup(r),
        RedirectionKind::HereDoc | RedirectionKind::HereString => apply_piped_literal(r),
    }
}

fn apply_dup(r: &Redirection) -> Result<(), ()> {
    if r.target == "-" {
        system::close(r.fd as i32);
        return Ok(());
    }
    let src: i32 = r.target.parse().map_err(|_| {
        eprintln!("tidesh: {}: invalid file descriptor", r.target);
    })?;
    dup2_checked(src, r.fd as i32, &r.target)
}

/// Feeds `r.target` (a here-document body or a pre-expanded here-string)
/// to `r.fd` via a pipe, with a forked grand-child doing the writing so a
/// body larger than the pipe buffer never deadlocks the command reading
/// it.
fn apply_piped_literal(r: &Redirection) -> Result<(), ()> {
    let body = if matches!(r.kind, RedirectionKind::HereString) {
        format!("{}\n", r.target)
    } else {
        r.target.clone()
    };

    let (read_fd, write_fd) = system::pipe().map_err(|e| eprintln!("tidesh: pipe: {e}"))?;

    // SAFETY: single-threaded process; the grand-child only writes to the
    // pipe and exits.
    match unsafe { system::fork() }.map_err(|e| eprintln!("tidesh: fork: {e}"))? {
        system::ForkResult::Child => {
            drop(read_fd);
            use std::io::Write;
            let mut f = std::fs::File::from(write_fd);
            let _ = f.write_all(body.as_bytes());
            std::process::exit(0);
        }
        system::ForkResult::Parent { .. } => {
            drop(write_fd);
            dup2_checked(read_fd.as_raw_fd(), r.fd as i32, "heredoc")
        }
    }
}

fn dup2_checked(from: std::os::fd::RawFd, to: i32, target: &str) -> Result<(), ()> {
    system::dup2(from, to).map_err(|e| eprintln!("tidesh: {target}: {e}"))
}
