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

//! Helpers shared by several built-in utilities: argument errors and
//! job-id resolution.

use thiserror::Error;
use tidesh_env::Env;

/// Errors common to several builtins' argument parsing.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ArgError {
    #[error("missing operand")]
    MissingOperand,
    #[error("too many operands")]
    TooManyOperands,
    #[error("{0}: numeric argument required")]
    NotANumber(String),
}

/// Resolves a job-id operand to a job-table id.
///
/// Accepts `%N`, a bare `N`, `%%`/`%+` (current job), `%-` (previous job),
/// or `None` (current job, the same default as an omitted operand to
/// `fg`/`bg`). Returns `None` if the operand names no job.
#[must_use]
pub fn resolve_job_spec(env: &Env, spec: Option<&str>) -> Option<u32> {
    match spec {
        None | Some("%%") | Some("%+") => env.jobs.current_id(),
        Some("%-") => env.jobs.previous_id(),
        Some(spec) => spec.strip_prefix('%').unwrap_or(spec).parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env::job::JobState;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn bare_digits_and_percent_prefix_both_resolve() {
        let (mut env, _guard) = fixture_env();
        let id = env.jobs.add(123, "sleep 1".into(), JobState::Running);
        assert_eq!(resolve_job_spec(&env, Some(&id.to_string())), Some(id));
        assert_eq!(resolve_job_spec(&env, Some(&format!("%{id}"))), Some(id));
    }

    #[test]
    fn omitted_spec_resolves_to_current_job() {
        let (mut env, _guard) = fixture_env();
        let id = env.jobs.add(123, "sleep 1".into(), JobState::Running);
        assert_eq!(resolve_job_spec(&env, None), Some(id));
    }
}
