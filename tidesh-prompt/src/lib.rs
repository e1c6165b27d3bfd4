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

//! Command line prompt rendering.
//!
//! The entry loop asks this crate for the text of the prompt and prints
//! it itself; this crate never touches raw terminal I/O. It substitutes
//! the handful of backslash escapes a POSIX-ish interactive shell's
//! prompt strings are expected to support, plus ordinary shell
//! variable/tilde expansion through `tidesh_semantics::expand`, each
//! gated by
//! [`Feature::PromptExpansion`](tidesh_env::features::Feature::PromptExpansion).

use tidesh_env::features::Feature;
use tidesh_env::Env;

/// Which of the two prompt variables to render.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// `$PS1`, shown before a new command.
    Primary,
    /// `$PS2`, shown while continuing an unterminated command.
    Continuation,
}

impl Kind {
    fn variable(self) -> &'static str {
        match self {
            Kind::Primary => "PS1",
            Kind::Continuation => "PS2",
        }
    }

    fn default_value(self) -> &'static str {
        match self {
            Kind::Primary => "\\u@\\h:\\w\\$ ",
            Kind::Continuation => "> ",
        }
    }
}

/// Renders the given prompt kind's current text.
///
/// With [`Feature::PromptExpansion`] disabled, the raw `$PS1`/`$PS2`
/// value (or its default) is returned unexpanded — the cheapest possible
/// prompt. Otherwise, shell variable/tilde
/// expansion runs first (so `$PS1` can itself reference other
/// variables), followed by the backslash-escape substitutions below.
#[must_use]
pub fn render(env: &mut Env, kind: Kind) -> String {
    let template = env
        .environment
        .get(kind.variable())
        .map(str::to_owned)
        .unwrap_or_else(|| kind.default_value().to_owned());

    if !env.features.is_enabled(Feature::PromptExpansion) {
        return template;
    }

    let expanded = tidesh_semantics::expand::expand_word(env, &template).join(" ");
    substitute_escapes(env, &expanded)
}

/// Expands the backslash escapes this crate supports:
///
/// - `\u` — the effective username (`$USER`, falling back to `$LOGNAME`)
/// - `\h` — the hostname up to the first `.` (`$HOSTNAME`)
/// - `\H` — the full hostname (`$HOSTNAME`)
/// - `\w` — the current directory, with a `$HOME` prefix collapsed to `~`
/// - `\W` — just the current directory's last component
/// - `\$` — `#` for an effective uid of 0, `$` otherwise
/// - `\n` — a newline
/// - `\\` — a literal backslash
/// - `\j` — the number of jobs currently tracked
fn substitute_escapes(env: &Env, input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('u') => out.push_str(username(env)),
            Some('h') => out.push_str(hostname(env).split('.').next().unwrap_or("")),
            Some('H') => out.push_str(hostname(env)),
            Some('w') => out.push_str(&working_dir(env)),
            Some('W') => out.push_str(working_dir_basename(env)),
            Some('$') => out.push(if is_root(env) { '#' } else { '$' }),
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some('j') => out.push_str(&env.jobs.len().to_string()),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn username(env: &Env) -> &str {
    env.environment
        .get("USER")
        .or_else(|| env.environment.get("LOGNAME"))
        .unwrap_or("?")
}

fn hostname(env: &Env) -> &str {
    env.environment.get_or("HOSTNAME", "?")
}

fn is_root(env: &Env) -> bool {
    env.environment.get("USER") == Some("root")
}

fn working_dir(env: &Env) -> String {
    let cwd = env.cwd.to_string_lossy();
    match env.environment.get("HOME") {
        Some(home) if !home.is_empty() => {
            if let Some(rest) = cwd.strip_prefix(home) {
                if rest.is_empty() {
                    return "~".to_owned();
                }
                if let Some(rest) = rest.strip_prefix('/') {
                    return format!("~/{rest}");
                }
            }
            cwd.into_owned()
        }
        _ => cwd.into_owned(),
    }
}

fn working_dir_basename(env: &Env) -> &str {
    env.cwd
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("/")
}
