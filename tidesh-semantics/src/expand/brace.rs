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

//! Brace expansion: `{a,b,c}` and `{A..B}` ranges, recursively expanded.

/// Expands the first expandable `{…}` in `word` (a top-level comma list or
/// a `..` range), recursing into each alternative until no expandable
/// brace remains. A word with no expandable brace is returned unchanged.
#[must_use]
pub fn expand(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    match find_expandable(&chars) {
        None => vec![word.to_owned()],
        Some((open, close)) => {
            let prefix: String = chars[..open].iter().collect();
            let body: String = chars[open + 1..close].iter().collect();
            let suffix: String = chars[close + 1..].iter().collect();
            let alternatives = parse_range(&body).unwrap_or_else(|| split_top_level_commas(&body));
            alternatives
                .into_iter()
                .flat_map(|alt| expand(&format!("{prefix}{alt}{suffix}")))
                .collect()
        }
    }
}

/// Finds the first `{…}` that is expandable: balanced, and containing a
/// top-level comma or `..`. Braces that don't qualify (no comma, no range)
/// are skipped and left for the caller to emit literally.
fn find_expandable(chars: &[char]) -> Option<(usize, usize)> {
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '{' {
            if let Some(close) = matching_close(chars, i) {
                if is_expandable_body(&chars[i + 1..close]) {
                    return Some((i, close));
                }
                i += 1;
                continue;
            }
        }
        i += 1;
    }
    None
}

fn matching_close(chars: &[char], open: usize) -> Option<usize> {
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

fn is_expandable_body(body: &[char]) -> bool {
    has_top_level(body, ',') || has_top_level_range(body)
}

fn has_top_level(body: &[char], sep: char) -> bool {
    let mut depth = 0;
    for &c in body {
        match c {
            '{' => depth += 1,
            '}' => depth -= 1,
            c if c == sep && depth == 0 => return true,
            _ => {}
        }
    }
    false
}

fn has_top_level_range(body: &[char]) -> bool {
    let mut depth = 0;
    let mut i = 0;
    while i < body.len() {
        match body[i] {
            '{' => depth += 1,
            '}' => depth -= 1,
            '.' if depth == 0 && body.get(i + 1) == Some(&'.') => return true,
            _ => {}
        }
        i += 1;
    }
    false
}

fn split_top_level_commas(body: &str) -> Vec<String> {
    let chars: Vec<char> = body.chars().collect();
    let mut parts = Vec::new();
    let mut depth = 0;
    let mut start = 0;
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '{' => depth += 1,
            '}' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(chars[start..i].iter().collect());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(chars[start..].iter().collect());
    parts
}

/// Parses `body` as an `A..B` range (numeric, zero-padded to the widest
/// operand's width, or single-character), auto-detecting step direction.
/// Returns `None` if `body` isn't a plain two-operand range at the top
/// level (a comma anywhere makes it a list instead).
fn parse_range(body: &str) -> Option<Vec<String>> {
    if has_top_level(&body.chars().collect::<Vec<_>>(), ',') {
        return None;
    }
    let chars: Vec<char> = body.chars().collect();
    let mut depth = 0;
    let mut dots = None;
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '{' => depth += 1,
            '}' => depth -= 1,
            '.' if depth == 0 && chars.get(i + 1) == Some(&'.') => {
                dots = Some(i);
                break;
            }
            _ => {}
        }
        i += 1;
    }
    let dots = dots?;
    let lhs = &body[..dots];
    let rhs = &body[dots + 2..];

    if let (Ok(a), Ok(b)) = (lhs.parse::<i64>(), rhs.parse::<i64>()) {
        let width = lhs.trim_start_matches('-').len().max(rhs.trim_start_matches('-').len());
        let pad = lhs.starts_with('0') || rhs.starts_with('0') || lhs.starts_with("-0") || rhs.starts_with("-0");
        let range: Vec<i64> = if a <= b { (a..=b).collect() } else { (b..=a).rev().collect() };
        return Some(
            range
                .into_iter()
                .map(|n| {
                    if pad {
                        format!("{n:0width$}", width = width)
                    } else {
                        n.to_string()
                    }
                })
                .collect(),
        );
    }

    let mut lhs_chars = lhs.chars();
    let mut rhs_chars = rhs.chars();
    if let (Some(a), None, Some(b), None) = (lhs_chars.next(), lhs_chars.next(), rhs_chars.next(), rhs_chars.next()) {
        if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() {
            let (start, end) = (a as u32, b as u32);
            let range: Vec<u32> = if start <= end {
                (start..=end).collect()
            } else {
                (end..=start).rev().collect()
            };
            return Some(
                range
                    .into_iter()
                    .filter_map(char::from_u32)
                    .map(String::from)
                    .collect(),
            );
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_list_expands() {
        assert_eq!(expand("{a,b}"), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn nested_braces_expand_in_order() {
        assert_eq!(
            expand("{a,b}{1..2}"),
            vec!["a1".to_string(), "a2".to_string(), "b1".to_string(), "b2".to_string()]
        );
    }

    #[test]
    fn numeric_range_zero_padded() {
        assert_eq!(expand("{01..03}"), vec!["01".to_string(), "02".to_string(), "03".to_string()]);
    }

    #[test]
    fn descending_range_reverses() {
        assert_eq!(expand("{3..1}"), vec!["3".to_string(), "2".to_string(), "1".to_string()]);
    }

    #[test]
    fn char_range_expands() {
        assert_eq!(expand("{a..d}"), vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()]);
    }

    #[test]
    fn non_expandable_brace_is_literal() {
        assert_eq!(expand("{only}"), vec!["{only}".to_string()]);
    }
}
