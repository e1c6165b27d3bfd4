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

//! Command history: a bounded, file-backed log with a navigation cursor.
//!
//! Entries persist as one line per command: `<unix_timestamp>,<command>\n`,
//! with literal newlines inside the command escaped to the two-byte
//! sequence `\n` (backslash, `n`). Loading is tolerant — the first comma
//! splits timestamp from body, so a malformed timestamp still recovers the
//! command text.

use std::collections::VecDeque;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

pub const DEFAULT_LIMIT: usize = 1000;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HistoryEntry {
    pub command: String,
    pub timestamp: i64,
}

/// A bounded log of previously entered command lines.
pub struct History {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
    file: Option<PathBuf>,
    /// Navigation cursor: `None` means "at the bottom, not browsing";
    /// `Some(i)` indexes into `entries` from the back (0 = most recent).
    cursor: Option<usize>,
    disabled: bool,
}

impl Default for History {
    fn default() -> Self {
        History {
            entries: VecDeque::new(),
            limit: DEFAULT_LIMIT,
            file: None,
            cursor: None,
            disabled: false,
        }
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(path: PathBuf) -> Self {
        History {
            file: Some(path),
            ..Self::default()
        }
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        self.truncate_to_limit();
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn truncate_to_limit(&mut self) {
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    /// Appends `command`, unless history is disabled or the command is
    /// empty/whitespace-only.
    pub fn append(&mut self, command: &str, timestamp: i64) {
        if self.disabled || command.trim().is_empty() {
            return;
        }
        self.entries.push_back(HistoryEntry {
            command: command.to_owned(),
            timestamp,
        });
        self.truncate_to_limit();
        self.reset_cursor();
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    /// Removes every entry, keeping the configured limit/file/disabled
    /// settings as they were.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Moves the cursor one step back (towards older entries) and returns
    /// the entry it now points at, or `None` if already at the oldest.
    pub fn previous(&mut self) -> Option<&HistoryEntry> {
        let next = match self.cursor {
            None => 0,
            Some(i) => i + 1,
        };
        if next >= self.entries.len() {
            return None;
        }
        self.cursor = Some(next);
        self.entries.get(self.entries.len() - 1 - next)
    }

    /// Moves the cursor one step forward (towards the most recent entry).
    /// Returns `None` once back at the bottom (not browsing).
    pub fn next(&mut self) -> Option<&HistoryEntry> {
        match self.cursor {
            None => None,
            Some(0) => {
                self.cursor = None;
                None
            }
            Some(i) => {
                self.cursor = Some(i - 1);
                self.entries.get(self.entries.len() - i)
            }
        }
    }

    fn escape(command: &str) -> String {
        command.replace('\n', "\\n")
    }

    fn unescape(escaped: &str) -> String {
        let mut out = String::with_capacity(escaped.len());
        let mut chars = escaped.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\\' && chars.peek() == Some(&'n') {
                chars.next();
                out.push('\n');
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Loads entries from the configured file, if any, appending them
    /// after whatever is already in memory.
    pub fn load(&mut self) -> io::Result<()> {
        let Some(path) = self.file.clone() else {
            return Ok(());
        };
        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };
        for line in contents.lines() {
            let Some((ts, escaped_cmd)) = line.split_once(',') else {
                continue;
            };
            let timestamp = ts.trim().parse().unwrap_or(0);
            self.entries.push_back(HistoryEntry {
                command: Self::unescape(escaped_cmd),
                timestamp,
            });
        }
        self.truncate_to_limit();
        Ok(())
    }

    /// Rewrites the configured file with the full in-memory history.
    pub fn save(&self) -> io::Result<()> {
        let Some(path) = &self.file else {
            return Ok(());
        };
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.timestamp.to_string());
            out.push(',');
            out.push_str(&Self::escape(&entry.command));
            out.push('\n');
        }
        let mut f = fs::File::create(path)?;
        f.write_all(out.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_respects_limit() {
        let mut h = History::new();
        h.set_limit(2);
        h.append("a", 1);
        h.append("b", 2);
        h.append("c", 3);
        let cmds: Vec<_> = h.iter().map(|e| e.command.as_str()).collect();
        assert_eq!(cmds, vec!["b", "c"]);
    }

    #[test]
    fn clear_empties_entries_but_keeps_settings() {
        let mut h = History::new();
        h.set_limit(5);
        h.append("a", 1);
        h.clear();
        assert!(h.is_empty());
        h.append("b", 2);
        h.append("c", 3);
        assert_eq!(h.iter().map(|e| e.command.as_str()).collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn disabled_history_drops_appends() {
        let mut h = History::new();
        h.set_disabled(true);
        h.append("a", 1);
        assert!(h.is_empty());
    }

    #[test]
    fn cursor_walks_back_then_forward() {
        let mut h = History::new();
        h.append("a", 1);
        h.append("b", 2);
        h.append("c", 3);
        assert_eq!(h.previous().unwrap().command, "c");
        assert_eq!(h.previous().unwrap().command, "b");
        assert_eq!(h.next().unwrap().command, "c");
        assert!(h.next().is_none());
    }

    #[test]
    fn save_then_load_round_trips_multiline_commands() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist");
        let mut h = History::with_file(path.clone());
        h.append("echo a\necho b", 42);
        h.save().unwrap();

        let mut loaded = History::with_file(path);
        loaded.load().unwrap();
        assert_eq!(loaded.iter().next().unwrap().command, "echo a\necho b");
        assert_eq!(loaded.iter().next().unwrap().timestamp, 42);
    }

    #[test]
    fn load_tolerates_missing_file() {
        let mut h = History::with_file(PathBuf::from("/nonexistent/path/to/history"));
        assert!(h.load().is_ok());
    }
}
