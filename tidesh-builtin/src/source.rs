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

//! The `.`/`source` built-in: reads a file and executes it in the
//! current shell environment.
//!
//! A name containing `/` is used as-is; otherwise `$PATH` is searched
//! directory by directory for a readable file of that name. This is a
//! plain directory scan rather than `Env::path_index`, since that index
//! only tracks executables, and a sourced file need not be one.

use std::path::PathBuf;
use tidesh_env::builtin::ExecResult;
use tidesh_env::Env;
use tidesh_syntax::source::Source;

pub fn main(env: &mut Env, args: Vec<String>) -> ExecResult {
    let Some((name, rest)) = args.split_first() else {
        eprintln!("tidesh: source: missing operand");
        return ExecResult::new(2);
    };
    let _ = rest; // positional parameters are not modeled

    let path = if name.contains('/') {
        PathBuf::from(name)
    } else {
        let path_var = env.environment.get_or("PATH", "");
        match find_on_path(name, &path_var) {
            Some(p) => p,
            None => {
                eprintln!("tidesh: source: {name}: not found");
                return ExecResult::new(1);
            }
        }
    };

    let script = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("tidesh: source: {}: {e}", path.display());
            return ExecResult::new(1);
        }
    };

    let source = Source::File { path: path.to_string_lossy().into_owned().into() };
    let status = tidesh_semantics::exec::execute_string_no_history(env, &script, source);
    ExecResult::new(status)
}

fn find_on_path(name: &str, path_var: &str) -> Option<PathBuf> {
    for dir in path_var.split(':').filter(|d| !d.is_empty()) {
        let candidate = std::path::Path::new(dir).join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn sources_a_file_by_path() {
        let (mut env, _guard) = fixture_env();
        let script = env.cwd.join("greet.sh");
        std::fs::write(&script, "export GREETED=yes\n").unwrap();

        let result = main(&mut env, vec![script.to_string_lossy().into_owned()]);
        assert_eq!(result.exit_status, 0);
        assert_eq!(env.environment.get("GREETED"), Some("yes"));
    }

    #[test]
    fn missing_file_reports_failure() {
        let (mut env, _guard) = fixture_env();
        let result = main(&mut env, vec!["/no/such/script.sh".into()]);
        assert_eq!(result.exit_status, 1);
    }

    #[test]
    fn missing_operand_is_an_error() {
        let (mut env, _guard) = fixture_env();
        let result = main(&mut env, vec![]);
        assert_eq!(result.exit_status, 2);
    }
}
