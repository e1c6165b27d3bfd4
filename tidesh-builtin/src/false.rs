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

//! The `false` built-in: does nothing, unsuccessfully.

use tidesh_env::builtin::ExecResult;
use tidesh_env::Env;

pub fn main(_env: &mut Env, _args: Vec<String>) -> ExecResult {
    ExecResult::new(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn exits_nonzero() {
        let (mut env, _guard) = fixture_env();
        assert_eq!(main(&mut env, vec![]).exit_status, 1);
    }
}
