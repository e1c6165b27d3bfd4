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

//! Process-global signal flags.
//!
//! SIGINT and SIGQUIT are ignored while the shell is reading a command
//! line (so `Ctrl-C` at the prompt doesn't kill the shell itself) and
//! SIGWINCH marks that the terminal was resized since the last check.
//! Handlers just flip an atomic and return; the entry loop polls these
//! flags once per prompt iteration rather than doing any work on the
//! signal stack.
//!
//! Forked children must reset all three dispositions to `SIG_DFL` before
//! doing anything else — interactive job control depends on a background
//! job being killable by the signals its own shell ignores.

use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);
static QUIT_REQUESTED: AtomicBool = AtomicBool::new(false);
static WINDOW_RESIZED: AtomicBool = AtomicBool::new(false);

/// Installs `SIG_IGN`-like handlers for `SIGINT`/`SIGQUIT` and a
/// flag-setting handler for `SIGWINCH`. Call once, early in `main`.
#[cfg(unix)]
pub fn install_handlers() -> nix::Result<()> {
    use nix::sys::signal::{self, SigHandler, Signal};

    extern "C" fn note_interrupt(_: libc::c_int) {
        INTERRUPTED.store(true, Ordering::SeqCst);
    }
    extern "C" fn note_quit(_: libc::c_int) {
        QUIT_REQUESTED.store(true, Ordering::SeqCst);
    }
    extern "C" fn note_resize(_: libc::c_int) {
        WINDOW_RESIZED.store(true, Ordering::SeqCst);
    }

    unsafe {
        signal::signal(Signal::SIGINT, SigHandler::Handler(note_interrupt))?;
        signal::signal(Signal::SIGQUIT, SigHandler::Handler(note_quit))?;
        signal::signal(Signal::SIGWINCH, SigHandler::Handler(note_resize))?;
    }
    Ok(())
}

/// Restores `SIGINT`/`SIGQUIT`/`SIGWINCH` to their default dispositions.
/// Must be called in every forked child before it execs or runs a
/// builtin, so background jobs remain killable by `Ctrl-C`.
#[cfg(unix)]
pub fn reset_to_default() -> nix::Result<()> {
    use nix::sys::signal::{self, SigHandler, Signal};
    unsafe {
        signal::signal(Signal::SIGINT, SigHandler::SigDfl)?;
        signal::signal(Signal::SIGQUIT, SigHandler::SigDfl)?;
        signal::signal(Signal::SIGWINCH, SigHandler::SigDfl)?;
    }
    Ok(())
}

/// Returns whether `SIGINT` arrived since the last call, clearing the
/// flag.
pub fn take_interrupted() -> bool {
    INTERRUPTED.swap(false, Ordering::SeqCst)
}

pub fn take_quit_requested() -> bool {
    QUIT_REQUESTED.swap(false, Ordering::SeqCst)
}

pub fn take_window_resized() -> bool {
    WINDOW_RESIZED.swap(false, Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_start_clear_and_latch_until_taken() {
        assert!(!take_interrupted());
        INTERRUPTED.store(true, Ordering::SeqCst);
        assert!(take_interrupted());
        assert!(!take_interrupted());
    }
}
