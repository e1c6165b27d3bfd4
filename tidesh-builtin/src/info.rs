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

//! The `info` built-in: prints the `TIDESH_*` build-info slots that
//! `Env::new` seeds at startup.

use tidesh_env::builtin::ExecResult;
use tidesh_env::Env;

const KEYS: &[&str] = &[
    "TIDESH_NAME",
    "TIDESH_VERSION",
    "TIDESH_BUILD_TYPE",
    "TIDESH_PID",
    "TIDESH_PPID",
    "TIDESH_EXECUTABLE",
];

pub fn main(env: &mut Env, _args: Vec<String>) -> ExecResult {
    for key in KEYS {
        println!("{key}={}", env.environment.get_or(key, ""));
    }
    ExecResult::new(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn prints_every_build_info_key() {
        let (mut env, _guard) = fixture_env();
        let result = main(&mut env, vec![]);
        assert_eq!(result.exit_status, 0);
    }
}
