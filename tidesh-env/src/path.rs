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

//! A prefix tree mapping executable basenames to absolute paths, lazily
//! populated by scanning `PATH` directories.
//!
//! Mirrors the alias table's 256-way byte trie (see
//! [`tidesh_syntax::alias::AliasTable`]) for the same reason: command-name
//! lookup is on the hot path of every external-command dispatch.

use std::path::{Path, PathBuf};

#[derive(Default)]
struct Node {
    children: Option<Box<[Option<Node>; 256]>>,
    path: Option<PathBuf>,
}

impl Node {
    fn children_mut(&mut self) -> &mut [Option<Node>; 256] {
        self.children
            .get_or_insert_with(|| Box::new(std::array::from_fn(|_| None)))
    }
}

/// Caches `PATH` lookups so repeated invocations of the same command don't
/// re-scan every directory on `PATH`.
///
/// The cache is invalidated wholesale (via [`PathIndex::invalidate`])
/// whenever `PATH` itself changes; there is no per-entry staleness
/// tracking, matching the original shell's "rehash on `PATH` write" model.
#[derive(Default)]
pub struct PathIndex {
    root: Node,
    scanned: bool,
}

impl PathIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every cached entry, forcing the next lookup to rescan `PATH`.
    pub fn invalidate(&mut self) {
        self.root = Node::default();
        self.scanned = false;
    }

    fn insert(&mut self, name: &str, path: PathBuf) {
        let mut node = &mut self.root;
        for &byte in name.as_bytes() {
            node = node.children_mut()[byte as usize].get_or_insert_with(Node::default);
        }
        node.path.get_or_insert(path);
    }

    fn get(&self, name: &str) -> Option<&Path> {
        let mut node = &self.root;
        for &byte in name.as_bytes() {
            node = node.children.as_ref()?[byte as usize].as_ref()?;
        }
        node.path.as_deref()
    }

    fn scan(&mut self, path_var: &str) {
        if self.scanned {
            return;
        }
        for dir in path_var.split(':').filter(|d| !d.is_empty()) {
            let Ok(entries) = std::fs::read_dir(dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let Ok(file_type) = entry.file_type() else {
                    continue;
                };
                if file_type.is_dir() {
                    continue;
                }
                if !is_executable(&entry.path()) {
                    continue;
                }
                if let Some(name) = entry.file_name().to_str() {
                    self.insert(name, entry.path());
                }
            }
        }
        self.scanned = true;
    }

    /// Resolves `cmd` to an absolute path.
    ///
    /// A `cmd` containing a `/` bypasses `PATH` entirely and is returned
    /// as-is if it refers to an executable file. Otherwise `PATH` (scanned
    /// and cached on first use) is consulted.
    pub fn resolve(&mut self, cmd: &str, path_var: &str) -> Option<PathBuf> {
        if cmd.contains('/') {
            let p = PathBuf::from(cmd);
            return is_executable(&p).then_some(p);
        }
        self.scan(path_var);
        self.get(cmd).map(Path::to_path_buf)
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn resolves_from_scanned_directory() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("mytool");
        {
            let mut f = std::fs::File::create(&exe).unwrap();
            writeln!(f, "#!/bin/sh").unwrap();
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        let mut index = PathIndex::new();
        let resolved = index.resolve("mytool", dir.path().to_str().unwrap());
        assert_eq!(resolved.as_deref(), Some(exe.as_path()));
    }

    #[test]
    fn slash_containing_name_bypasses_path() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("direct");
        std::fs::File::create(&exe).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        let mut index = PathIndex::new();
        let resolved = index.resolve(exe.to_str().unwrap(), "");
        assert_eq!(resolved.as_deref(), Some(exe.as_path()));
    }
}
