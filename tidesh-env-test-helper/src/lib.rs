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

//! Shared [`Env`] fixtures for tests across the `tidesh-*` crates.
//!
//! `tidesh-env` routes syscalls directly rather than through a swappable
//! virtual filesystem (see the design note in `tidesh_env::system`), so
//! the fixture here is a real [`Env`] rooted at a freshly created
//! temporary directory, so tests that `cd`, create files, or otherwise
//! touch the filesystem never read or write anything outside their own
//! sandbox.

use std::path::PathBuf;
use tempfile::TempDir;
use tidesh_env::Env;

/// Keeps the fixture's temporary directory alive for as long as the `Env`
/// it seeded is in use. Dropping this removes the directory tree.
pub struct FixtureGuard {
    _dir: TempDir,
}

/// Builds a fresh [`Env`] rooted at a new temporary directory.
///
/// The returned [`FixtureGuard`] must be kept alive for as long as the
/// `Env` is used (its `Drop` impl removes the backing directory); binding
/// it to `_guard` at the call site, as the doctests below do, is enough.
///
/// ```
/// # use tidesh_env_test_helper::fixture_env;
/// let (env, _guard) = fixture_env();
/// assert_eq!(env.environment.exit_status(), 0);
/// ```
#[must_use]
pub fn fixture_env() -> (Env, FixtureGuard) {
    let dir = TempDir::new().expect("failed to create fixture temp directory");
    let mut env = Env::new();
    let cwd: PathBuf = dir.path().to_path_buf();
    env.environment.set("HOME", cwd.to_string_lossy().into_owned());
    env.environment.set("OLDPWD", cwd.to_string_lossy().into_owned());
    env.set_cwd(cwd);
    (env, FixtureGuard { _dir: dir })
}

/// Like [`fixture_env`], but also registers `builtins` before handing the
/// `Env` back, so builtin-dispatch tests don't have to repeat the
/// registration boilerplate.
#[must_use]
pub fn fixture_env_with_builtins(
    builtins: impl IntoIterator<Item = (&'static str, tidesh_env::builtin::Builtin)>,
) -> (Env, FixtureGuard) {
    let (mut env, guard) = fixture_env();
    for (name, builtin) in builtins {
        env.register_builtin(name, builtin);
    }
    (env, guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_env_is_rooted_in_a_fresh_directory() {
        let (env, _guard) = fixture_env();
        assert!(env.cwd.exists());
        assert_eq!(env.environment.get("PWD"), Some(env.cwd.to_string_lossy().as_ref()));
    }

    #[test]
    fn two_fixtures_get_distinct_directories() {
        let (env_a, _guard_a) = fixture_env();
        let (env_b, _guard_b) = fixture_env();
        assert_ne!(env_a.cwd, env_b.cwd);
    }
}
