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

//! Runs a single [`SimpleCommand`]: expands its argv, applies its leading
//! assignments, and dispatches to a special/job-control builtin (run
//! in-process), a regular builtin, or an external program (both of the
//! latter forked so their standard streams can be redirected without
//! disturbing the shell's own).

use tidesh_env::builtin::Type;
use tidesh_env::system::{self, ForkResult};
use tidesh_env::Env;
use tidesh_syntax::syntax::{RedirectionKind, SimpleCommand};

use super::{compound, process_sub, redirect};
use crate::expand::{self, ExpandedArg};

/// Runs `cmd`, returning its exit status.
pub fn execute(cmd: &SimpleCommand, env: &mut Env) -> i32 {
    if cmd.args.is_empty() {
        apply_assignments(cmd, env);
        return 0;
    }

    let argv = match resolve_argv(cmd, env) {
        Some(argv) if !argv.is_empty() => argv,
        _ => return 0,
    };
    let name = argv[0].clone();

    if let Some(builtin) = env.builtin(&name).copied() {
        return match builtin.r#type {
            Type::Special | Type::JobControl => {
                apply_assignments(cmd, env);
                let result = (builtin.execute)(env, argv[1..].to_vec());
                if let Some(status) = result.exit_shell {
                    env.exit_requested = Some(status);
                }
                result.exit_status
            }
            Type::Regular => fork_and_run(cmd, env, move |env| {
                let result = (builtin.execute)(env, argv[1..].to_vec());
                result.exit_status
            }),
        };
    }

    let path_var = env.environment.get("PATH").unwrap_or("").to_owned();
    let Some(path) = env.path_index.resolve(&name, &path_var) else {
        eprintln!("tidesh: {name}: command not found");
        return 127;
    };

    fork_and_run(cmd, env, move |env| {
        let envp = env.environment.to_assignment_strings();
        let err = system::execve(&path, &argv, &envp);
        eprintln!("tidesh: {name}: {err}");
        126
    })
}

/// Expands argv, splicing any process-substitution entries in as
/// `/dev/fd/N` paths.
fn resolve_argv(cmd: &SimpleCommand, env: &mut Env) -> Option<Vec<String>> {
    let expanded = expand::expand_argv(env, &cmd.args);
    let mut argv = Vec::with_capacity(expanded.len());
    for entry in expanded {
        match entry {
            ExpandedArg::Word(w) => argv.push(w),
            ExpandedArg::ProcessSubIn(inner) => {
                argv.push(process_sub::substitute_path(&inner, RedirectionKind::In, env)?)
            }
            ExpandedArg::ProcessSubOut(inner) => {
                argv.push(process_sub::substitute_path(&inner, RedirectionKind::Out, env)?)
            }
        }
    }
    Some(argv)
}

/// Applies `cmd`'s leading `NAME=VALUE` assignments to `env`'s variable
/// environment. The assignment's right-hand side goes through variable and
/// tilde expansion like any other word, but its fields (if the expansion
/// produced more than one) are rejoined rather than kept separate — an
/// assignment's value is always a single string.
fn apply_assignments(cmd: &SimpleCommand, env: &mut Env) {
    for assignment in &cmd.assignments {
        let fields = expand::expand_word(env, &assignment.value);
        env.environment.set(&assignment.name, fields.join(""));
    }
}

/// Forks, applies `cmd`'s redirections and assignments in the child, runs
/// `run` there and exits with its status; the parent gives the child its
/// own process group (so it can be stopped/foregrounded independently),
/// briefly hands it the controlling terminal, waits for it, and restores
/// terminal ownership to the shell.
fn fork_and_run(cmd: &SimpleCommand, env: &mut Env, run: impl FnOnce(&mut Env) -> i32) -> i32 {
    // SAFETY: single-threaded process; the child only sets up its process
    // group, redirections and assignments before running `run` and exiting.
    match unsafe { system::fork() } {
        Ok(ForkResult::Child) => {
            let _ = system::setpgid(0, 0);
            let _ = tidesh_env::signals::reset_to_default();
            apply_assignments(cmd, env);
            if redirect::apply_all(&cmd.redirects, env).is_err() {
                std::process::exit(1);
            }
            let status = run(env);
            std::process::exit(status);
        }
        Ok(ForkResult::Parent { child }) => {
            let pid = child.as_raw();
            let _ = system::setpgid(pid, pid);
            let foreground = !super::is_background();
            if foreground {
                system::tcsetpgrp_stdin(pid);
            }
            let status = compound::wait_for(pid);
            if foreground {
                system::tcsetpgrp_stdin(env.jobs.shell_pgid);
            }
            status
        }
        Err(e) => {
            eprintln!("tidesh: fork: {e}");
            1
        }
    }
}
