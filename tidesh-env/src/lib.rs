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

//! The shell's execution environment: everything that outlives a single
//! parsed command.
//!
//! [`Env`] aggregates everything a running session needs to carry between
//! commands: the variable [`Environment`](environment::Environment), the alias table
//! (owned by `tidesh-syntax` since the parser needs it synchronously
//! mid-parse), the [`PathIndex`](path::PathIndex), the [`DirStack`]
//! (dirstack::DirStack), the [`JobSet`](job::JobSet), [`History`]
//! (history::History) and [`FeatureFlags`](features::FeatureFlags). Forked
//! children get their own copy of this struct at fork time and never write
//! back to the parent — there is no shared-memory path for them to do so.

pub mod builtin;
pub mod dirstack;
pub mod environment;
pub mod features;
pub mod history;
pub mod job;
pub mod path;
pub mod signals;
pub mod system;

use builtin::Builtin;
use dirstack::DirStack;
use environment::Environment;
use features::FeatureFlags;
use history::History;
use job::JobSet;
use path::PathIndex;
use std::collections::HashMap;
use std::path::PathBuf;
use tidesh_syntax::alias::AliasTable;

/// The whole shell execution environment, constructed once per shell
/// invocation.
pub struct Env {
    pub environment: Environment,
    pub aliases: AliasTable,
    pub path_index: PathIndex,
    pub dirstack: DirStack,
    pub jobs: JobSet,
    pub history: History,
    pub features: FeatureFlags,
    /// Current working directory, tracked independently of `PWD` so `cd`
    /// can detect symlink-resolution differences before deciding what to
    /// write into `PWD`/`OLDPWD`.
    pub cwd: PathBuf,
    /// Set by the `exit` builtin (and by a foreground job terminating on a
    /// fatal signal while running as the whole command line); the entry
    /// loop checks this after every `execute_string` call and stops if set.
    pub exit_requested: Option<i32>,
    /// Re-entrancy guard for the `.tidesh-hooks` mechanism: set while a
    /// hook script is running so a hook cannot recursively trigger itself.
    pub hooks_disabled: bool,
    pub shell_pid: i32,
    pub shell_pgid: i32,
    /// Name → implementation table. Populated once at startup by whoever
    /// assembles the shell (`tidesh-cli`'s `main`, or a test fixture);
    /// empty on a freshly constructed `Env`.
    pub builtins: HashMap<String, Builtin>,
}

impl Env {
    /// Builds a fresh session, seeding the variable environment from the
    /// host process's inherited environment and applying the startup
    /// contract: `SHELL`, `SHELL_NAME`, `SHLVL`
    /// (incremented), `HOME` (filled in from `getpwuid` if unset), `PWD`,
    /// `OLDPWD`, `$`, `?`, `!`, `_`, and the `TIDESH_*` build-info slots.
    #[must_use]
    pub fn new() -> Self {
        let mut environment = Environment::from_process();
        let pid = system::getpid();
        let pgid = system::getpgrp();
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));

        environment.set("SHELL", "tidesh");
        environment.set("SHELL_NAME", "tidesh");
        let shlvl: i32 = environment.get("SHLVL").and_then(|v| v.parse().ok()).unwrap_or(0);
        environment.set("SHLVL", (shlvl + 1).to_string());
        if environment.get("HOME").is_none() {
            if let Some(home) = home_dir_from_passwd() {
                environment.set("HOME", home);
            }
        }
        environment.set("PWD", cwd.to_string_lossy().into_owned());
        if environment.get("OLDPWD").is_none() {
            environment.set("OLDPWD", cwd.to_string_lossy().into_owned());
        }
        environment.set("$", pid.to_string());
        environment.set_exit_status(0);
        environment.set("!", "");
        environment.set("_", "tidesh");
        environment.set("TIDESH_PID", pid.to_string());
        environment.set("TIDESH_PPID", nix::unistd::getppid().as_raw().to_string());
        environment.set(
            "TIDESH_EXECUTABLE",
            std::env::current_exe()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        environment.set("TIDESH_BUILD_TYPE", if cfg!(debug_assertions) { "debug" } else { "release" });
        environment.set("TIDESH_NAME", "tidesh");
        environment.set("TIDESH_VERSION", env!("CARGO_PKG_VERSION"));

        Env {
            environment,
            aliases: AliasTable::new(),
            path_index: PathIndex::new(),
            dirstack: DirStack::new(),
            jobs: JobSet::new(pgid),
            history: History::new(),
            features: FeatureFlags::new(),
            cwd,
            exit_requested: None,
            hooks_disabled: false,
            shell_pid: pid,
            shell_pgid: pgid,
            builtins: HashMap::new(),
        }
    }

    /// Updates `PWD`/`OLDPWD` after a successful directory change, matching
    /// the environment contract: the previous `PWD` becomes `OLDPWD`.
    pub fn set_cwd(&mut self, new_cwd: PathBuf) {
        let old = self.environment.get("PWD").map(str::to_owned);
        if let Some(old) = old {
            self.environment.set("OLDPWD", old);
        }
        self.environment.set("PWD", new_cwd.to_string_lossy().into_owned());
        self.cwd = new_cwd;
    }

    /// Registers a builtin under `name`, replacing any previous definition.
    pub fn register_builtin(&mut self, name: &str, builtin: Builtin) {
        self.builtins.insert(name.to_owned(), builtin);
    }

    #[must_use]
    pub fn builtin(&self, name: &str) -> Option<&Builtin> {
        self.builtins.get(name)
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
fn home_dir_from_passwd() -> Option<String> {
    nix::unistd::User::from_uid(nix::unistd::getuid())
        .ok()
        .flatten()
        .map(|u| u.dir.to_string_lossy().into_owned())
}

#[cfg(not(unix))]
fn home_dir_from_passwd() -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_env_sets_shell_slots() {
        let env = Env::new();
        assert_eq!(env.environment.get("SHELL"), Some("tidesh"));
        assert!(env.environment.get("SHLVL").is_some());
        assert_eq!(env.environment.exit_status(), 0);
    }

    #[test]
    fn set_cwd_rotates_pwd_into_oldpwd() {
        let mut env = Env::new();
        let first_pwd = env.environment.get("PWD").unwrap().to_owned();
        env.set_cwd(PathBuf::from("/tmp"));
        assert_eq!(env.environment.get("OLDPWD"), Some(first_pwd.as_str()));
        assert_eq!(env.environment.get("PWD"), Some("/tmp"));
    }
}
