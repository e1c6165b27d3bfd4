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

//! Variable expansion: `$NAME`, `${NAME}` and its modifier forms, and the
//! word-splitting `$=NAME` / `${=NAME}` forms.
//!
//! This is the one stage of the pipeline that can change array cardinality:
//! every other stage broadcasts over whatever fields it's handed, but a
//! word-splitting reference flushes the field buffered so far and emits
//! each whitespace-separated piece of the variable's value as its own
//! independent field, then resumes buffering into a fresh one. Grounded on
//! `original_source/src/expansions/variables.c`'s `find_closing_brace`
//! returning `-1` on an unmatched `${`, which falls through to a literal
//! `${` rather than an error.

use tidesh_env::Env;

/// Expands every variable reference in `word`, returning the resulting
/// fields. A word with no word-splitting reference always yields exactly
/// one field (possibly empty); one or more `$=NAME`/`${=NAME}` references
/// can yield more.
#[must_use]
pub fn expand(env: &mut Env, word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' if chars.get(i + 1) == Some(&'$') => {
                cur.push('$');
                i += 2;
            }
            '$' => match scan_reference(&chars, i) {
                Some(Reference { consumed, form }) => {
                    i += consumed;
                    match eval_reference(env, &form) {
                        Eval::Value(v) => cur.push_str(&v),
                        Eval::Split(pieces) => {
                            out.push(std::mem::take(&mut cur));
                            out.extend(pieces);
                        }
                        Eval::Abort => return Vec::new(),
                    }
                }
                None => {
                    cur.push('$');
                    i += 1;
                }
            },
            c => {
                cur.push(c);
                i += 1;
            }
        }
    }

    if !cur.is_empty() || out.is_empty() {
        out.push(cur);
    }
    out
}

enum Form {
    Simple { name: String, split: bool },
    Length { name: String },
    Default { name: String, value: String },
    Assign { name: String, value: String },
    Alternate { name: String, value: String },
    ErrorIfUnset { name: String, message: String },
}

struct Reference {
    consumed: usize,
    form: Form,
}

enum Eval {
    Value(String),
    Split(Vec<String>),
    Abort,
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_name_continue(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

/// Scans a `$`-introduced reference starting at `chars[start]` (which must
/// be `$`). Returns `None` if what follows isn't a valid reference, leaving
/// the caller to treat `$` as a literal character.
fn scan_reference(chars: &[char], start: usize) -> Option<Reference> {
    debug_assert_eq!(chars[start], '$');
    let mut i = start + 1;

    if chars.get(i) == Some(&'=') {
        i += 1;
        let name_start = i;
        while i < chars.len() && is_name_continue(chars[i]) {
            i += 1;
        }
        if i == name_start {
            return None;
        }
        let name: String = chars[name_start..i].iter().collect();
        return Some(Reference {
            consumed: i - start,
            form: Form::Simple { name, split: true },
        });
    }

    if chars.get(i) == Some(&'{') {
        let close = find_closing_brace(chars, i)?;
        let body: String = chars[i + 1..close].iter().collect();
        let form = parse_braced_form(&body)?;
        return Some(Reference {
            consumed: close + 1 - start,
            form,
        });
    }

    if let Some(&c) = chars.get(i) {
        if matches!(c, '?' | '!' | '$' | '_') {
            return Some(Reference {
                consumed: i + 1 - start,
                form: Form::Simple {
                    name: c.to_string(),
                    split: false,
                },
            });
        }
        if c.is_ascii_digit() {
            return Some(Reference {
                consumed: i + 1 - start,
                form: Form::Simple {
                    name: c.to_string(),
                    split: false,
                },
            });
        }
        if is_name_start(c) {
            let name_start = i;
            i += 1;
            while i < chars.len() && is_name_continue(chars[i]) {
                i += 1;
            }
            let name: String = chars[name_start..i].iter().collect();
            return Some(Reference {
                consumed: i - start,
                form: Form::Simple { name, split: false },
            });
        }
    }

    None
}

/// Finds the `}` matching the `{` at `chars[open]`, accounting for nested
/// braces so `${X:-{a,b}}` doesn't close early. Returns `None` (unmatched
/// `${`, fell through to a literal) on failure, per the original's
/// `find_closing_brace` contract.
fn find_closing_brace(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 0;
    let mut i = open;
    while i < chars.len() {
        match chars[i] {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn parse_braced_form(body: &str) -> Option<Form> {
    if let Some(rest) = body.strip_prefix('#') {
        return Some(Form::Length { name: rest.to_owned() });
    }
    if let Some(rest) = body.strip_prefix('=') {
        return Some(Form::Simple {
            name: rest.to_owned(),
            split: true,
        });
    }
    if let Some(idx) = body.find(":-") {
        let name = body[..idx].to_owned();
        let value = body[idx + 2..].to_owned();
        return Some(Form::Default { name, value });
    }
    if let Some(idx) = body.find(":=") {
        let name = body[..idx].to_owned();
        let value = body[idx + 2..].to_owned();
        return Some(Form::Assign { name, value });
    }
    if let Some(idx) = body.find(":+") {
        let name = body[..idx].to_owned();
        let value = body[idx + 2..].to_owned();
        return Some(Form::Alternate { name, value });
    }
    if let Some(idx) = body.find(":?") {
        let name = body[..idx].to_owned();
        let message = body[idx + 2..].to_owned();
        return Some(Form::ErrorIfUnset { name, message });
    }
    Some(Form::Simple {
        name: body.to_owned(),
        split: false,
    })
}

fn lookup<'a>(env: &'a Env, name: &str) -> Option<&'a str> {
    env.environment.get(name)
}

fn eval_reference(env: &mut Env, form: &Form) -> Eval {
    match form {
        Form::Simple { name, split } => {
            let value = lookup(env, name).unwrap_or("").to_owned();
            if *split {
                Eval::Split(value.split_whitespace().map(str::to_owned).collect())
            } else {
                Eval::Value(value)
            }
        }
        Form::Length { name } => {
            let len = lookup(env, name).map(str::len).unwrap_or(0);
            Eval::Value(len.to_string())
        }
        Form::Default { name, value } => match lookup(env, name) {
            Some(v) if !v.is_empty() => Eval::Value(v.to_owned()),
            _ => Eval::Value(value.clone()),
        },
        Form::Assign { name, value } => match lookup(env, name) {
            Some(v) if !v.is_empty() => Eval::Value(v.to_owned()),
            _ => {
                env.environment.set(name, value.clone());
                Eval::Value(value.clone())
            }
        },
        Form::Alternate { name, value } => match lookup(env, name) {
            Some(v) if !v.is_empty() => Eval::Value(value.clone()),
            _ => Eval::Value(String::new()),
        },
        Form::ErrorIfUnset { name, message } => match lookup(env, name) {
            Some(v) if !v.is_empty() => Eval::Value(v.to_owned()),
            _ => {
                if message.is_empty() {
                    eprintln!("tidesh: {name}: parameter null or not set");
                } else {
                    eprintln!("tidesh: {name}: {message}");
                }
                Eval::Abort
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn simple_name_expands() {
        let (mut env, _guard) = fixture_env();
        env.environment.set("FOO", "bar");
        assert_eq!(expand(&mut env, "$FOO"), vec!["bar".to_string()]);
    }

    #[test]
    fn unset_name_expands_to_empty() {
        let (mut env, _guard) = fixture_env();
        assert_eq!(expand(&mut env, "[$UNSET]"), vec!["[]".to_string()]);
    }

    #[test]
    fn braced_length() {
        let (mut env, _guard) = fixture_env();
        env.environment.set("FOO", "abcd");
        assert_eq!(expand(&mut env, "${#FOO}"), vec!["4".to_string()]);
    }

    #[test]
    fn default_value_when_unset() {
        let (mut env, _guard) = fixture_env();
        assert_eq!(expand(&mut env, "${FOO:-def}"), vec!["def".to_string()]);
    }

    #[test]
    fn assign_persists_default() {
        let (mut env, _guard) = fixture_env();
        expand(&mut env, "${FOO:=def}");
        assert_eq!(env.environment.get("FOO"), Some("def"));
    }

    #[test]
    fn alternate_is_empty_when_unset() {
        let (mut env, _guard) = fixture_env();
        assert_eq!(expand(&mut env, "${FOO:+alt}"), vec![String::new()]);
        env.environment.set("FOO", "x");
        assert_eq!(expand(&mut env, "${FOO:+alt}"), vec!["alt".to_string()]);
    }

    #[test]
    fn error_if_unset_aborts_expansion() {
        let (mut env, _guard) = fixture_env();
        assert_eq!(expand(&mut env, "prefix${FOO:?missing}suffix"), Vec::<String>::new());
    }

    #[test]
    fn backslash_dollar_suppresses_expansion() {
        let (mut env, _guard) = fixture_env();
        env.environment.set("FOO", "bar");
        assert_eq!(expand(&mut env, "\\$FOO"), vec!["$FOO".to_string()]);
    }

    #[test]
    fn unmatched_brace_is_literal() {
        let (mut env, _guard) = fixture_env();
        assert_eq!(expand(&mut env, "${FOO"), vec!["${FOO".to_string()]);
    }

    #[test]
    fn word_split_flushes_and_splits() {
        let (mut env, _guard) = fixture_env();
        env.environment.set("FOO", "a  b c");
        assert_eq!(
            expand(&mut env, "x$=FOOy"),
            vec!["x".to_string(), "a".to_string(), "b".to_string(), "c".to_string(), "y".to_string()]
        );
    }
}
