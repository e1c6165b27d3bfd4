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

//! Filename (glob) expansion: `*`, `?`, `[...]` patterns matched against the
//! filesystem, mirroring `NOSORT | MARK` semantics on top of the `glob`
//! crate (which doesn't expose either flag directly): matches are collected
//! unsorted, sorted here, and directory matches get a trailing `/`.

use glob::{MatchOptions, Pattern};

const OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

#[must_use]
pub fn expand(field: &str) -> Vec<String> {
    if !is_pattern(field) {
        return vec![field.to_owned()];
    }
    if Pattern::new(field).is_err() {
        return vec![field.to_owned()];
    }

    let mut matches: Vec<String> = match glob::glob_with(field, OPTIONS) {
        Ok(paths) => paths
            .flatten()
            .map(|p| {
                let marked = if p.is_dir() {
                    let mut s = p.to_string_lossy().into_owned();
                    if !s.ends_with('/') {
                        s.push('/');
                    }
                    s
                } else {
                    p.to_string_lossy().into_owned()
                };
                marked
            })
            .collect(),
        Err(_) => Vec::new(),
    };

    if matches.is_empty() {
        return vec![field.to_owned()];
    }
    matches.sort();
    matches
}

fn is_pattern(field: &str) -> bool {
    field.contains(['*', '?', '['])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn non_pattern_passes_through() {
        assert_eq!(expand("plain.txt"), vec!["plain.txt".to_string()]);
    }

    #[test]
    fn unmatched_pattern_is_kept_literal() {
        assert_eq!(expand("/no/such/dir/*.nope"), vec!["/no/such/dir/*.nope".to_string()]);
    }

    #[test]
    fn matches_are_sorted_and_dirs_marked() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::create_dir(dir.path().join("csub")).unwrap();
        let pattern = format!("{}/*", dir.path().display());
        let results = expand(&pattern);
        assert_eq!(results.len(), 3);
        assert!(results[0].ends_with("a.txt"));
        assert!(results[1].ends_with("b.txt"));
        assert!(results[2].ends_with("csub/"));
    }
}
