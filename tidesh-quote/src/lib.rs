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

//! Quotes a string so that feeding it back through the shell yields the
//! same value as a single field.
//!
//! Used wherever a shell value is redisplayed to a user as shell input
//! rather than as plain text: the `alias` builtin printing definitions,
//! `jobs` printing the command line of a job, and history re-editing.
//!
//! [`quote`] picks one of three forms:
//!
//! - If the string is non-empty and contains no character that needs
//!   quoting, it is returned unchanged.
//! - Otherwise, if it contains no single quote, the whole string is
//!   single-quoted.
//! - Otherwise, the whole string is double-quoted, with `"`, `` ` ``, `$`
//!   and `\` backslash-escaped.
//!
//! A character needs quoting if it is one of `; & | ( ) < >`, whitespace,
//! `$ \` \` \" ' = * ?`, a leading `#` or `~`, or part of a `{...}` or
//! `[...]` span (tidesh's brace/filename expansions treat those as
//! potentially significant).
//!
//! ```
//! # use std::borrow::Cow::{Borrowed, Owned};
//! # use tidesh_quote::quote;
//! assert_eq!(quote("foo"), Borrowed("foo"));
//! assert_eq!(quote(""), Owned::<str>("''".to_owned()));
//! assert_eq!(quote("$foo"), Owned::<str>("'$foo'".to_owned()));
//! assert_eq!(quote("'$foo'"), Owned::<str>(r#""'\$foo'""#.to_owned()));
//! ```

use std::borrow::Cow::{self, Borrowed, Owned};

/// Quotes `s` for safe reuse as shell input.
///
/// Returns `Borrowed(s)` if no quoting is needed, `Owned(_)` otherwise.
/// See the [module doc](self) for the decision rules.
pub fn quote(s: &str) -> Cow<'_, str> {
    if !s.is_empty() && !str_needs_quoting(s) {
        return Borrowed(s);
    }

    if s.find('\'').is_none() {
        return Owned(format!("'{s}'"));
    }

    let mut result = String::with_capacity(s.len().saturating_add(8));
    result.push('"');
    for c in s.chars() {
        if matches!(c, '"' | '`' | '$' | '\\') {
            result.push('\\');
        }
        result.push(c);
    }
    result.push('"');
    Owned(result)
}

fn str_needs_quoting(s: &str) -> bool {
    if s.chars().any(char_needs_quoting) {
        return true;
    }

    if let Some(c) = s.chars().next() {
        if c == '#' || c == '~' {
            return true;
        }
    }

    if let Some(i) = s.find('{') {
        if s[i + 1..].contains('}') {
            return true;
        }
    }

    if let Some(i) = s.find('[') {
        if s[i + 1..].contains(']') {
            return true;
        }
    }

    false
}

fn char_needs_quoting(c: char) -> bool {
    match c {
        ';' | '&' | '|' | '(' | ')' | '<' | '>' | ' ' | '\t' | '\n' => true,
        '$' | '`' | '\\' | '"' | '\'' | '=' | '*' | '?' => true,
        _ => c.is_whitespace(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_quoting() {
        fn check(s: &str) {
            assert_eq!(quote(s), Borrowed(s));
        }
        check("a");
        check("z");
        check("_");
        check("!#%+,-./:@^~");
        check("{");
        check("{x");
        check("}");
        check("x}");
        check("[");
        check("[x");
        check("]");
        check("x]");
    }

    #[test]
    fn single_quoted() {
        fn check(s: &str) {
            assert_eq!(quote(s), Owned::<str>(format!("'{s}'")));
        }
        check("");
        for c in ";&|()<> \t\n\u{3000}$`\\\"=*?#~".chars() {
            check(&c.to_string());
        }
        check("{}");
        check("{a}");
        check("[]");
        check("[a]");
    }

    #[test]
    fn double_quoted() {
        fn check(input: &str, output: &str) {
            assert_eq!(quote(input), Owned::<str>(output.to_string()));
        }
        check("'", r#""'""#);
        check(r#"'"'"#, r#""'\"'""#);
        check("'$", r#""'\$""#);
        check("'foo'", r#""'foo'""#);
        check(r#"'\'\\''"#, r#""'\\'\\\\''""#);
        check("'{\n}'", "\"'{\n}'\"");
    }
}
