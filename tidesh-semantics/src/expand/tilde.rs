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

//! Tilde expansion. Recognised only at the start of a field or right after
//! a `:` within it (so `PATH`-shaped fields like `~/bin:~other/bin` expand
//! every component, not just the first).

use tidesh_env::Env;

#[must_use]
pub fn expand(env: &Env, field: &str) -> String {
    let chars: Vec<char> = field.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        let at_boundary = i == 0 || chars[i - 1] == ':';
        if at_boundary && chars[i] == '~' {
            let (replacement, consumed) = expand_at(env, &chars[i..]);
            out.push_str(&replacement);
            i += consumed;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/// Expands the tilde-prefix starting at `chars[0]` (which must be `~`).
/// Returns the replacement text and how many characters of `chars` it
/// consumed (at least 1, for the `~` itself).
fn expand_at(env: &Env, chars: &[char]) -> (String, usize) {
    debug_assert_eq!(chars[0], '~');
    let mut end = 1;
    while end < chars.len() && chars[end] != '/' && chars[end] != ':' {
        end += 1;
    }
    let operand: String = chars[1..end].iter().collect();

    let replacement = if operand.is_empty() {
        env.environment.get("HOME").map(str::to_owned)
    } else if operand == "+" {
        Some(env.cwd.to_string_lossy().into_owned())
    } else if operand == "-" {
        env.environment.get("OLDPWD").map(str::to_owned)
    } else if let Ok(n) = operand.parse::<usize>() {
        env.dirstack.peek(n).map(str::to_owned)
    } else {
        user_home_dir(&operand)
    };

    match replacement {
        Some(r) => (r, end),
        None => {
            if let Ok(n) = operand.parse::<usize>() {
                eprintln!("tidesh: ~{n}: directory stack has no entry {n}");
            }
            (chars[..end].iter().collect(), end)
        }
    }
}

#[cfg(unix)]
fn user_home_dir(name: &str) -> Option<String> {
    nix::unistd::User::from_name(name)
        .ok()
        .flatten()
        .map(|u| u.dir.to_string_lossy().into_owned())
}

#[cfg(not(unix))]
fn user_home_dir(_name: &str) -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn bare_tilde_is_home() {
        let (mut env, _guard) = fixture_env();
        env.environment.set("HOME", "/home/x");
        assert_eq!(expand(&env, "~"), "/home/x");
        assert_eq!(expand(&env, "~/docs"), "/home/x/docs");
    }

    #[test]
    fn plus_is_cwd() {
        let (env, _guard) = fixture_env();
        let cwd = env.cwd.to_string_lossy().into_owned();
        assert_eq!(expand(&env, "~+"), cwd);
    }

    #[test]
    fn minus_is_oldpwd() {
        let (mut env, _guard) = fixture_env();
        env.environment.set("OLDPWD", "/prev");
        assert_eq!(expand(&env, "~-"), "/prev");
    }

    #[test]
    fn not_at_boundary_is_literal() {
        let (env, _guard) = fixture_env();
        assert_eq!(expand(&env, "a~b"), "a~b");
    }

    #[test]
    fn digit_out_of_range_is_literal_with_diagnostic() {
        let (env, _guard) = fixture_env();
        assert_eq!(expand(&env, "~0/x"), "~0/x");
    }

    #[test]
    fn digit_in_range_resolves_dirstack_entry() {
        let (mut env, _guard) = fixture_env();
        env.dirstack.push("/stacked".to_owned());
        assert_eq!(expand(&env, "~0"), "/stacked");
    }
}
