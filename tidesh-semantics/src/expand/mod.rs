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

//! The ordered expansion pipeline: variable → tilde → brace → filename.
//!
//! Each stage is a pure `Vec<String> -> Vec<String>` transform (variable
//! expansion is the one stage that can change cardinality from a single
//! input; everything downstream just broadcasts over whatever array it is
//! handed), gated independently by [`Feature`](tidesh_env::features::Feature)
//! so a minimal build can drop stages without touching this module's
//! control flow.

pub mod brace;
pub mod filename;
pub mod tilde;
pub mod variable;

use tidesh_env::features::Feature;
use tidesh_env::Env;
use tidesh_syntax::syntax::Arg;

/// An expanded argv entry: either an ordinary field produced by the
/// expansion pipeline, or a process-substitution entry carried through
/// unexpanded for the executor to resolve at fork time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExpandedArg {
    Word(String),
    ProcessSubIn(String),
    ProcessSubOut(String),
}

impl ExpandedArg {
    #[must_use]
    pub fn as_word(&self) -> Option<&str> {
        match self {
            ExpandedArg::Word(w) => Some(w),
            _ => None,
        }
    }
}

/// Runs a single word through every enabled stage of the pipeline, in
/// order, producing the fields it expands to (usually one).
#[must_use]
pub fn expand_word(env: &mut Env, word: &str) -> Vec<String> {
    let mut fields = if env.features.is_enabled(Feature::VariableExpansion) {
        variable::expand(env, word)
    } else {
        vec![word.to_owned()]
    };

    if env.features.is_enabled(Feature::TildeExpansion) {
        fields = fields.iter().map(|f| tilde::expand(env, f)).collect();
    }

    if env.features.is_enabled(Feature::BraceExpansion) {
        fields = fields.iter().flat_map(|f| brace::expand(f)).collect();
    }

    if env.features.is_enabled(Feature::FilenameExpansion) {
        fields = fields.into_iter().flat_map(|f| filename::expand(&f)).collect();
    }

    fields
}

/// Expands a whole argument vector, broadcasting [`expand_word`] over every
/// `Arg::Word` entry and carrying process-substitution entries through
/// unexpanded (the executor resolves those to `/dev/fd/N` at fork time).
#[must_use]
pub fn expand_argv(env: &mut Env, args: &[Arg]) -> Vec<ExpandedArg> {
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Arg::Word(w) => out.extend(expand_word(env, w).into_iter().map(ExpandedArg::Word)),
            Arg::ProcessSubIn(inner) => out.push(ExpandedArg::ProcessSubIn(inner.clone())),
            Arg::ProcessSubOut(inner) => out.push(ExpandedArg::ProcessSubOut(inner.clone())),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn pipeline_runs_variable_then_brace() {
        let (mut env, _guard) = fixture_env();
        env.environment.set("X", "1");
        let fields = expand_word(&mut env, "$X{a,b}");
        assert_eq!(fields, vec!["1a".to_string(), "1b".to_string()]);
    }

    #[test]
    fn disabled_stage_is_skipped() {
        let (mut env, _guard) = fixture_env();
        env.features.disable(Feature::BraceExpansion);
        let fields = expand_word(&mut env, "{a,b}");
        assert_eq!(fields, vec!["{a,b}".to_string()]);
    }
}
