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

//! Alias definitions and the prefix tree that stores them.
//!
//! Aliases are looked up by the parser on the first word of a command, once
//! per word, so the lookup is on the hot path of parsing every simple
//! command. A byte-indexed 256-way trie keeps that lookup linear in the
//! length of the word rather than paying hashing cost for short names.

use crate::source::Location;
use std::rc::Rc;

/// A single alias definition.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Alias {
    pub name: String,
    pub replacement: String,
    pub origin: Location,
}

#[derive(Default)]
struct Node {
    children: Option<Box<[Option<Node>; 256]>>,
    alias: Option<Rc<Alias>>,
}

impl Node {
    fn children_mut(&mut self) -> &mut [Option<Node>; 256] {
        self.children
            .get_or_insert_with(|| Box::new(std::array::from_fn(|_| None)))
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node").field("alias", &self.alias).finish()
    }
}

/// A 256-way byte-indexed prefix tree mapping alias names to their
/// definitions.
///
/// Iteration order is not guaranteed; callers that need a stable listing
/// (e.g. the `alias` built-in with no operands) should sort by name.
#[derive(Debug, Default)]
pub struct AliasTable {
    root: Node,
    len: usize,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines or redefines an alias.
    ///
    /// Returns the previous definition, if any.
    pub fn insert(&mut self, name: String, replacement: String, origin: Location) -> Option<Rc<Alias>> {
        let mut node = &mut self.root;
        for &byte in name.as_bytes() {
            node = node.children_mut()[byte as usize].get_or_insert_with(Node::default);
        }
        let alias = Rc::new(Alias {
            name,
            replacement,
            origin,
        });
        let old = node.alias.replace(alias);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    /// Removes an alias definition, returning it if it existed.
    pub fn remove(&mut self, name: &str) -> Option<Rc<Alias>> {
        let mut node = &mut self.root;
        for &byte in name.as_bytes() {
            node = node.children.as_mut()?[byte as usize].as_mut()?;
        }
        let removed = node.alias.take();
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Removes every alias definition.
    pub fn clear(&mut self) {
        self.root = Node::default();
        self.len = 0;
    }

    /// Looks up the alias bound to `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rc<Alias>> {
        let mut node = &self.root;
        for &byte in name.as_bytes() {
            node = node.children.as_ref()?[byte as usize].as_ref()?;
        }
        node.alias.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns all defined aliases in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<Alias>> {
        let mut out = Vec::with_capacity(self.len);
        Self::collect(&self.root, &mut out);
        out.into_iter()
    }

    fn collect<'a>(node: &'a Node, out: &mut Vec<&'a Rc<Alias>>) {
        if let Some(alias) = &node.alias {
            out.push(alias);
        }
        if let Some(children) = &node.children {
            for child in children.iter().flatten() {
                Self::collect(child, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut table = AliasTable::new();
        assert!(table.get("ll").is_none());
        table.insert("ll".to_owned(), "ls -l".to_owned(), Location::dummy());
        assert_eq!(table.get("ll").unwrap().replacement, "ls -l");
    }

    #[test]
    fn remove_restores_absence() {
        let mut table = AliasTable::new();
        table.insert("ll".to_owned(), "ls -l".to_owned(), Location::dummy());
        let removed = table.remove("ll").unwrap();
        assert_eq!(removed.replacement, "ls -l");
        assert!(table.get("ll").is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn shared_prefixes_do_not_collide() {
        let mut table = AliasTable::new();
        table.insert("l".to_owned(), "ls".to_owned(), Location::dummy());
        table.insert("ll".to_owned(), "ls -l".to_owned(), Location::dummy());
        assert_eq!(table.get("l").unwrap().replacement, "ls");
        assert_eq!(table.get("ll").unwrap().replacement, "ls -l");
        assert_eq!(table.len(), 2);
    }
}
