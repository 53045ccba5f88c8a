//! Conflict detection and diagnostic aggregation

use super::flag_state::FlagState;
use super::rules::{ConflictRule, Severity, CONFLICT_RULES};
use super::token::FlagToken;
use std::fmt::Write;

/// One triggered rule together with the tokens that triggered it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub rule: &'static ConflictRule,
    pub active: Vec<FlagToken>,
}

/// Triggered rules for one resolution pass, in rule-table order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictReport {
    conflicts: Vec<Conflict>,
}

/// Evaluate the canonical rule table against a flag snapshot
pub fn detect_conflicts(state: &FlagState) -> ConflictReport {
    detect_with(state, CONFLICT_RULES)
}

/// Evaluate `rules` against a flag snapshot.
///
/// Every rule is tested; a rule is triggered when more than one of its
/// tokens is active.
pub fn detect_with(state: &FlagState, rules: &'static [ConflictRule]) -> ConflictReport {
    let conflicts = rules
        .iter()
        .filter_map(|rule| {
            let active: Vec<FlagToken> =
                state.active_among(rule.flags).into_iter().copied().collect();
            (active.len() > 1).then_some(Conflict { rule, active })
        })
        .collect();
    ConflictReport { conflicts }
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn rules(&self) -> impl Iterator<Item = &'static ConflictRule> + '_ {
        self.conflicts.iter().map(|c| c.rule)
    }

    pub fn has_errors(&self) -> bool {
        self.conflicts.iter().any(|c| c.rule.is_error())
    }

    pub fn contains(&self, rule: &ConflictRule) -> bool {
        self.conflicts.iter().any(|c| std::ptr::eq(c.rule, rule))
    }

    /// Split into (error-severity report, everything else)
    pub fn partition(self) -> (ConflictReport, ConflictReport) {
        let (errors, rest): (Vec<Conflict>, Vec<Conflict>) = self
            .conflicts
            .into_iter()
            .partition(|c| c.rule.severity == Severity::Error);
        (
            ConflictReport { conflicts: errors },
            ConflictReport { conflicts: rest },
        )
    }

    /// Keep only conflicts matching the predicate
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Conflict) -> bool,
    {
        self.conflicts.retain(|c| keep(c));
    }

    /// Human-readable diagnostic covering every conflict, numbered from 1
    pub fn render(&self) -> String {
        let mut out = String::new();
        let heading = if self.conflicts.len() == 1 {
            "Conflicting flags detected:".to_string()
        } else {
            format!("Conflicting flags detected ({} conflicts):", self.conflicts.len())
        };
        out.push_str(&heading);

        for (index, conflict) in self.conflicts.iter().enumerate() {
            let rule = conflict.rule;
            let flags = conflict
                .active
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            // Writing to a String cannot fail.
            let _ = write!(
                out,
                "\n\n  {}. {}\n     Conflicting flags: {}\n     Suggestion: {}",
                index + 1,
                rule.description,
                flags,
                rule.suggestion
            );
            if !rule.examples.is_empty() {
                out.push_str("\n     Examples:");
                for example in rule.examples {
                    let _ = write!(out, "\n       {}", example);
                }
            }
        }
        out
    }
}
