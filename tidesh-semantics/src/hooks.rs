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

//! The `.tidesh-hooks` lifecycle mechanism.
//!
//! A script at `.tidesh-hooks/<name>` in the current directory, if present
//! and executable, is sourced (in the shell's own process, like `source`)
//! at named lifecycle points (`before_cmd`, `after_cmd`, `cd`, `start`,
//! `end`, env/alias/job transitions). This module exposes a single op:
//! run a hook by name with an environment-variable overlay, then restore.
//! Recursion is prevented by `env.hooks_disabled`.

use std::path::Path;
use tidesh_env::Env;
use tidesh_syntax::source::Source;

/// Runs `.tidesh-hooks/<name>`, if present, executable, and hooks aren't
/// disabled (recursion guard or a feature/flag). `overlay` variables are
/// set before the hook runs and restored (to their previous value, or
/// unset) afterwards. Returns the hook's exit status, or `None` if it
/// didn't run.
pub fn run(env: &mut Env, name: &str, overlay: &[(&str, &str)]) -> Option<i32> {
    if env.hooks_disabled {
        return None;
    }

    let path = Path::new(".tidesh-hooks").join(name);
    if !is_executable_file(&path) {
        return None;
    }

    let script = std::fs::read_to_string(&path).ok()?;

    let previous: Vec<(String, Option<String>)> = overlay
        .iter()
        .map(|(k, _)| (k.to_string(), env.environment.get(k).map(str::to_owned)))
        .collect();
    for (k, v) in overlay {
        env.environment.set(k, *v);
    }

    env.hooks_disabled = true;
    let status = crate::exec::execute_string_no_history(
        env,
        &script,
        Source::File {
            path: path.to_string_lossy().into_owned().into(),
        },
    );
    env.hooks_disabled = false;

    for (k, v) in previous {
        match v {
            Some(v) => env.environment.set(&k, v),
            None => {
                env.environment.remove(&k);
            }
        }
    }

    Some(status)
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn missing_hook_is_a_no_op() {
        let (mut env, _guard) = fixture_env();
        assert_eq!(run(&mut env, "before_cmd", &[]), None);
    }

    #[test]
    fn disabled_guard_prevents_recursion() {
        let (mut env, _guard) = fixture_env();
        env.hooks_disabled = true;
        assert_eq!(run(&mut env, "before_cmd", &[]), None);
    }
}
