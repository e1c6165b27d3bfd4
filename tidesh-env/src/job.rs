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

//! The job table: background and stopped processes under the shell's
//! observation.
//!
//! Backed by a [`slab::Slab`] rather than a plain `Vec`: a `Slab` hands
//! back the smallest currently-unused key on insert, which is exactly the
//! "smallest unused id ≥ 1, reusing gaps" allocation job ids need — they
//! are just slab keys shifted up by one so they start at 1 instead of 0.

use slab::Slab;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JobState {
    Running,
    Stopped,
    Done,
    Killed,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JobState::Running => "Running",
            JobState::Stopped => "Stopped",
            JobState::Done => "Done",
            JobState::Killed => "Killed",
        })
    }
}

#[derive(Clone, Debug)]
pub struct Job {
    pub pid: i32,
    pub command_text: String,
    pub state: JobState,
    pub exit_status: i32,
    pub notified: bool,
}

/// The session's job table plus the shell's own process group id.
pub struct JobSet {
    jobs: Slab<Job>,
    pub shell_pgid: i32,
}

impl JobSet {
    #[must_use]
    pub fn new(shell_pgid: i32) -> Self {
        JobSet {
            jobs: Slab::new(),
            shell_pgid,
        }
    }

    /// Registers a new job, returning its session-local id (≥ 1).
    pub fn add(&mut self, pid: i32, command_text: String, state: JobState) -> u32 {
        let key = self.jobs.insert(Job {
            pid,
            command_text,
            state,
            exit_status: 0,
            notified: false,
        });
        key as u32 + 1
    }

    fn key(id: u32) -> Option<usize> {
        (id as usize).checked_sub(1)
    }

    #[must_use]
    pub fn get(&self, id: u32) -> Option<&Job> {
        self.jobs.get(Self::key(id)?)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Job> {
        self.jobs.get_mut(Self::key(id)?)
    }

    #[must_use]
    pub fn get_by_pid(&self, pid: i32) -> Option<(u32, &Job)> {
        self.jobs
            .iter()
            .find(|(_, j)| j.pid == pid)
            .map(|(k, j)| (k as u32 + 1, j))
    }

    pub fn remove(&mut self, id: u32) -> Option<Job> {
        let key = Self::key(id)?;
        self.jobs.try_remove(key)
    }

    /// Iterates `(id, job)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Job)> {
        let mut v: Vec<_> = self.jobs.iter().map(|(k, j)| (k as u32 + 1, j)).collect();
        v.sort_by_key(|(id, _)| *id);
        v.into_iter()
    }

    /// The id of the current job (`%%`/`%+`): the largest id present.
    #[must_use]
    pub fn current_id(&self) -> Option<u32> {
        self.jobs.iter().map(|(k, _)| k as u32 + 1).max()
    }

    /// The id of the previous job (`%-`): the second-largest id present.
    #[must_use]
    pub fn previous_id(&self) -> Option<u32> {
        let mut ids: Vec<u32> = self.jobs.iter().map(|(k, _)| k as u32 + 1).collect();
        ids.sort_unstable();
        ids.iter().rev().nth(1).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one_and_reuse_gaps() {
        let mut jobs = JobSet::new(100);
        let a = jobs.add(1, "a".into(), JobState::Running);
        let b = jobs.add(2, "b".into(), JobState::Running);
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        jobs.remove(a);
        let c = jobs.add(3, "c".into(), JobState::Running);
        assert_eq!(c, 1, "freed id should be reused before a new one is minted");
    }

    #[test]
    fn current_and_previous_track_largest_two_ids() {
        let mut jobs = JobSet::new(100);
        jobs.add(1, "a".into(), JobState::Running);
        jobs.add(2, "b".into(), JobState::Running);
        jobs.add(3, "c".into(), JobState::Running);
        assert_eq!(jobs.current_id(), Some(3));
        assert_eq!(jobs.previous_id(), Some(2));
    }
}
