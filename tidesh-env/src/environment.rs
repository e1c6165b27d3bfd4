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

//! The shell's variable environment: an insertion-ordered `name -> value`
//! mapping plus the shell-managed special parameters (`?`, `!`, `_`, `$`,
//! `SHLVL`, ...).
//!
//! Mutations go through [`Environment::set`] and [`Environment::remove`] so
//! that a single registered observer slot can be notified of every change.
//! The hooks system is the only subscriber shipped here, but the slot is a
//! plain closure, not a global, so tests can install their own capturing
//! observer.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Observer invoked after every [`Environment::set`] or
/// [`Environment::remove`] call with `(name, old_value, new_value)`.
pub type ChangeHook = Box<dyn FnMut(&str, Option<&str>, Option<&str>)>;

/// An insertion-ordered mapping of shell variable names to values.
#[derive(Default)]
pub struct Environment {
    order: Vec<String>,
    values: HashMap<String, String>,
    on_change: Option<ChangeHook>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an `Environment` pre-populated from the process's inherited
    /// environment (`std::env::vars`), preserving whatever order the OS
    /// hands them back in.
    #[must_use]
    pub fn from_process() -> Self {
        let mut env = Self::new();
        for (name, value) in std::env::vars() {
            env.set(&name, value);
        }
        env
    }

    /// Installs the observer invoked after every mutating call. Replaces
    /// any previously installed observer.
    pub fn set_change_hook(&mut self, hook: ChangeHook) {
        self.on_change = Some(hook);
    }

    pub fn clear_change_hook(&mut self) {
        self.on_change = None;
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns `name`'s value, or `default` if unset or empty — the shape
    /// most parameter-default expansions want.
    #[must_use]
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        match self.get(name) {
            Some(v) if !v.is_empty() => v,
            _ => default,
        }
    }

    /// Sets `name` to `value`, appending it to the insertion order if new.
    /// Invokes the change hook with the previous value (if any) and the new
    /// one.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        let old = match self.values.entry(name.to_owned()) {
            Entry::Occupied(mut e) => Some(e.insert(value.clone())),
            Entry::Vacant(e) => {
                self.order.push(name.to_owned());
                e.insert(value.clone());
                None
            }
        };
        if let Some(hook) = &mut self.on_change {
            hook(name, old.as_deref(), Some(&value));
        }
    }

    /// Removes `name`, invoking the change hook with the removed value (if
    /// any) and `None`. Returns the removed value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let old = self.values.remove(name);
        if old.is_some() {
            self.order.retain(|n| n != name);
        }
        if let Some(hook) = &mut self.on_change {
            hook(name, old.as_deref(), None);
        }
        old
    }

    /// Iterates `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .map(move |n| (n.as_str(), self.values[n].as_str()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Renders every entry as a `NAME=VALUE` string, in insertion order —
    /// the shape `execve`'s `envp` needs.
    #[must_use]
    pub fn to_assignment_strings(&self) -> Vec<String> {
        self.iter().map(|(n, v)| format!("{n}={v}")).collect()
    }

    /// Sets the `?` special parameter to an exit status.
    pub fn set_exit_status(&mut self, status: i32) {
        self.set("?", status.to_string());
    }

    #[must_use]
    pub fn exit_status(&self) -> i32 {
        self.get("?").and_then(|v| v.parse().ok()).unwrap_or(0)
    }

    /// Sets the `!` special parameter (pid of the most recently started
    /// background job).
    pub fn set_background_pid(&mut self, pid: i32) {
        self.set("!", pid.to_string());
    }

    /// Sets the `_` special parameter (last argument of the previous
    /// command).
    pub fn set_last_arg(&mut self, arg: &str) {
        self.set("_", arg);
    }
}

impl Clone for Environment {
    /// Clones the variable table. The change hook is *not* carried over:
    /// clones are made to hand a snapshot to a child process's `execve`
    /// arguments, which never mutates the parent's observer.
    fn clone(&self) -> Self {
        Environment {
            order: self.order.clone(),
            values: self.values.clone(),
            on_change: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get() {
        let mut env = Environment::new();
        env.set("FOO", "bar");
        assert_eq!(env.get("FOO"), Some("bar"));
    }

    #[test]
    fn insertion_order_preserved_across_updates() {
        let mut env = Environment::new();
        env.set("A", "1");
        env.set("B", "2");
        env.set("A", "3");
        let names: Vec<_> = env.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn remove_drops_from_order() {
        let mut env = Environment::new();
        env.set("A", "1");
        env.remove("A");
        assert!(env.get("A").is_none());
        assert_eq!(env.iter().count(), 0);
    }

    #[test]
    fn change_hook_sees_old_and_new() {
        use std::cell::RefCell;
        use std::rc::Rc;
        let seen: Rc<RefCell<Vec<(String, Option<String>, Option<String>)>>> =
            Rc::default();
        let seen2 = Rc::clone(&seen);
        let mut env = Environment::new();
        env.set_change_hook(Box::new(move |name, old, new| {
            seen2.borrow_mut().push((
                name.to_owned(),
                old.map(str::to_owned),
                new.map(str::to_owned),
            ));
        }));
        env.set("FOO", "1");
        env.set("FOO", "2");
        env.remove("FOO");
        let log = seen.borrow();
        assert_eq!(log[0], ("FOO".into(), None, Some("1".into())));
        assert_eq!(log[1], ("FOO".into(), Some("1".into()), Some("2".into())));
        assert_eq!(log[2], ("FOO".into(), Some("2".into()), None));
    }

    #[test]
    fn get_or_falls_back_on_unset_or_empty() {
        let mut env = Environment::new();
        assert_eq!(env.get_or("X", "def"), "def");
        env.set("X", "");
        assert_eq!(env.get_or("X", "def"), "def");
        env.set("X", "v");
        assert_eq!(env.get_or("X", "def"), "v");
    }
}
