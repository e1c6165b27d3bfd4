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

//! Walks a parsed [`Command`] tree, forking processes, wiring pipes and
//! redirections, dispatching builtins, and keeping `session.environ["?"]`
//! and the job table up to date.
//!
//! The shell process itself never holds a lock or shares memory with a
//! child: every suspension point here is a plain blocking syscall
//! (`waitpid`, `read`/`write` on a pipe), keeping concurrency
//! single-threaded and directly blocking rather than routed through an
//! async executor.

mod compound;
pub mod jobs;
mod process_sub;
mod redirect;
mod simple;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tidesh_env::Env;
use tidesh_syntax::parser::{parse_line, ParserOptions};
use tidesh_syntax::source::Source;
use tidesh_syntax::syntax::Command;

use crate::lexer_host::ExecutingHost;

/// Whether the current process is running as (or inside) a backgrounded
/// `&` job rather than the shell's own foreground. Set once, in the
/// child produced by [`compound::execute_async`], and never cleared:
/// every further fork down that process's tree inherits the copy made at
/// `fork()`, so a `Command::Pipe`/`Command::Simple` nested under an
/// `Async` node knows not to fight the shell for the controlling
/// terminal. A process that isn't a background job is never a member of
/// a background process group relative to the terminal, so calling
/// `tcsetpgrp` from it is safe; a process that is one would earn itself
/// a `SIGTTOU` for trying.
static IS_BACKGROUND: AtomicBool = AtomicBool::new(false);

pub(crate) fn is_background() -> bool {
    IS_BACKGROUND.load(Ordering::Relaxed)
}

pub(crate) fn mark_background() {
    IS_BACKGROUND.store(true, Ordering::Relaxed);
}

/// Walks `node`, updating `env.environment["?"]` as it goes, and returns the
/// exit status of the last command run.
pub fn execute(node: &Command, env: &mut Env) -> i32 {
    let status = match node {
        Command::Simple(cmd) => simple::execute(cmd, env),
        Command::Pipe { left, right } => compound::execute_pipe(left, right, env),
        Command::And { left, right } => {
            let status = execute(left, env);
            if status == 0 {
                execute(right, env)
            } else {
                status
            }
        }
        Command::Or { left, right } => {
            let status = execute(left, env);
            if status != 0 {
                execute(right, env)
            } else {
                status
            }
        }
        Command::Sequence { left, right } => {
            execute(left, env);
            execute(right, env)
        }
        Command::Subshell { body } => compound::execute_subshell(body, env),
        Command::Async { body } => compound::execute_async(body, env),
    };
    env.environment.set_exit_status(status);
    status
}

/// Lexes, parses and executes one complete line of input, appending it to
/// history (unless suppressed). This is the entry point `tidesh-cli`'s
/// entry loop, the `eval`/`source` builtins, and `--eval`/rc/script
/// sourcing all funnel through.
pub fn execute_string(env: &mut Env, input: &str, source: Source) -> i32 {
    execute_string_impl(env, input, source, false)
}

/// Like [`execute_string`], but never appends to history — used for
/// rc/script sourcing and for the re-entrant `$(…)` call below.
pub fn execute_string_no_history(env: &mut Env, input: &str, source: Source) -> i32 {
    execute_string_impl(env, input, source, true)
}

fn execute_string_impl(env: &mut Env, input: &str, source: Source, suppress_history: bool) -> i32 {
    let aliases_enabled = env.features.is_enabled(tidesh_env::features::Feature::AliasExpansion);
    let parser_options = ParserOptions {
        aliases: aliases_enabled,
        pipes: env.features.is_enabled(tidesh_env::features::Feature::Pipes),
        sequences: env.features.is_enabled(tidesh_env::features::Feature::Sequences),
        subshells: env.features.is_enabled(tidesh_env::features::Feature::Subshells),
        assignments: env.features.is_enabled(tidesh_env::features::Feature::Assignments),
        redirections: env.features.is_enabled(tidesh_env::features::Feature::Redirections),
    };

    let (tree, errors) = {
        // `parse_line` wants a read-only `&AliasTable` for first-word alias
        // lookup *and* a `&mut dyn LexerHost` for `$(…)` substitution, but
        // the host needs the whole `&mut Env` (command substitution can
        // touch anything: jobs, history, builtins). Safe Rust can't split
        // that borrow through the `&mut Env` function boundary `host`
        // crosses, so it's done by hand here.
        let aliases_ptr: *const tidesh_syntax::alias::AliasTable = &env.aliases;
        let mut host = ExecutingHost::new(env);
        // SAFETY: `host` only ever mutates `env.environment`/`env.jobs`/
        // `env.history`/etc. through its `execute_string_stdout` callback;
        // it never reads or writes `env.aliases`, so dereferencing
        // `aliases_ptr` alongside the live `&mut Env` inside `host` never
        // observes or causes a conflicting access to the same memory.
        let aliases_ref = unsafe { &*aliases_ptr };
        parse_line(input, source, Some(aliases_ref), parser_options, &mut host)
    };

    for error in &errors {
        eprintln!("tidesh: {error}");
    }

    let Some(tree) = tree else {
        return if errors.is_empty() { 0 } else { 1 };
    };

    let status = execute(&tree, env);

    if !suppress_history && env.features.is_enabled(tidesh_env::features::Feature::History) {
        let ts = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs() as i64).unwrap_or(0);
        env.history.append(input, ts);
    }

    status
}

/// Runs `input` as a command, capturing its standard output, for `$(…)`
/// command substitution. Re-enters the interpreter in a forked child so the
/// parent's state (including history) is never touched by the nested call;
/// trailing newlines are left in place for the caller (the lexer's
/// `substitute_command` strips them).
pub fn execute_string_stdout(env: &mut Env, input: &str) -> String {
    use std::io::Read;
    use tidesh_env::system;

    let Ok((read_fd, write_fd)) = system::pipe() else {
        return String::new();
    };

    // SAFETY: single-threaded process; child only does async-signal-safe
    // work before `exit`.
    match unsafe { system::fork() } {
        Ok(system::ForkResult::Child) => {
            drop(read_fd);
            let _ = system::dup2(std::os::fd::AsRawFd::as_raw_fd(&write_fd), 1);
            drop(write_fd);
            let _ = tidesh_env::signals::reset_to_default();
            let status = execute_string_no_history(env, input, Source::CommandSubstitution);
            std::process::exit(status);
        }
        Ok(system::ForkResult::Parent { child }) => {
            drop(write_fd);
            let mut buf = Vec::new();
            let mut file = std::fs::File::from(read_fd);
            let _ = file.read_to_end(&mut buf);
            let _ = system::waitpid_blocking(child);
            String::from_utf8_lossy(&buf).into_owned()
        }
        Err(_) => String::new(),
    }
}
