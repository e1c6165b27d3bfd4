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

//! Runtime-togglable shell features, plus a compile-time disable mask
//! that always wins over whatever a builtin sets at runtime.

use enumset::{EnumSet, EnumSetType};

#[derive(Debug, EnumSetType)]
pub enum Feature {
    VariableExpansion,
    TildeExpansion,
    BraceExpansion,
    FilenameExpansion,
    AliasExpansion,
    JobControl,
    History,
    DirStack,
    Pipes,
    Redirections,
    Sequences,
    Subshells,
    CommandSubstitution,
    Assignments,
    PromptExpansion,
    Completion,
}

/// Features this build was compiled without. Empty by default; a
/// distributor building a minimal `tidesh` would set this at the point
/// `FeatureFlags::new` is called.
pub const DISABLED: EnumSet<Feature> = EnumSet::empty();

/// A bitset of enabled features, with `DISABLED` permanently masked out.
pub struct FeatureFlags {
    enabled: EnumSet<Feature>,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        FeatureFlags {
            enabled: EnumSet::all() - DISABLED,
        }
    }
}

impl FeatureFlags {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.enabled.contains(feature)
    }

    /// Enables `feature`, unless it's compiled out, in which case this is
    /// a no-op: compile-time disables always win.
    pub fn enable(&mut self, feature: Feature) {
        self.enabled.insert(feature);
        self.apply_compile_time_disables();
    }

    pub fn disable(&mut self, feature: Feature) {
        self.enabled.remove(feature);
    }

    fn apply_compile_time_disables(&mut self) {
        self.enabled -= DISABLED;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_features_enabled_by_default() {
        let flags = FeatureFlags::new();
        assert!(flags.is_enabled(Feature::JobControl));
        assert!(flags.is_enabled(Feature::BraceExpansion));
    }

    #[test]
    fn disable_then_enable_round_trips() {
        let mut flags = FeatureFlags::new();
        flags.disable(Feature::History);
        assert!(!flags.is_enabled(Feature::History));
        flags.enable(Feature::History);
        assert!(flags.is_enabled(Feature::History));
    }
}
