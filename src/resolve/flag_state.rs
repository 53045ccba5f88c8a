//! Snapshot of the flags active for one invocation
//!
//! Built once from the parsed command line and never mutated afterwards.
//! Boolean switches contribute their bare token; value flags contribute the
//! bare token whenever a value was supplied and remember that value so that
//! value-qualified tokens can be matched.

use super::token::FlagToken;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagState {
    active: BTreeSet<&'static str>,
    values: BTreeMap<&'static str, String>,
}

impl FlagState {
    pub fn builder() -> FlagStateBuilder {
        FlagStateBuilder::default()
    }

    /// Whether the token is active.
    ///
    /// A value-qualified token needs both the bare flag to be active and the
    /// recorded value to match.
    pub fn is_active(&self, token: &FlagToken) -> bool {
        match token {
            FlagToken::Bare(name) => self.active.contains(name),
            FlagToken::ValueEquals(name, expected) => {
                self.active.contains(name)
                    && self
                        .values
                        .get(name)
                        .is_some_and(|value| value.eq_ignore_ascii_case(expected))
            }
        }
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.active.contains(name)
    }

    /// The normalized value recorded for a value flag
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Tokens from `tokens` that are active, in the given order
    pub fn active_among<'t>(&self, tokens: &'t [FlagToken]) -> Vec<&'t FlagToken> {
        tokens.iter().filter(|t| self.is_active(t)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// A new state holding only the named flags (and their values)
    pub fn restricted_to(&self, names: &[&str]) -> FlagState {
        FlagState {
            active: self
                .active
                .iter()
                .copied()
                .filter(|name| names.contains(name))
                .collect(),
            values: self
                .values
                .iter()
                .filter(|(name, _)| names.contains(name))
                .map(|(name, value)| (*name, value.clone()))
                .collect(),
        }
    }
}

/// Accumulates flag values before freezing them into a [`FlagState`]
#[derive(Debug, Default)]
pub struct FlagStateBuilder {
    state: FlagState,
}

impl FlagStateBuilder {
    /// Record a boolean switch
    pub fn switch(mut self, name: &'static str, enabled: bool) -> Self {
        if enabled {
            self.state.active.insert(name);
        }
        self
    }

    /// Record a value flag; blank values count as not supplied
    pub fn value(mut self, name: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.state.active.insert(name);
            self.state.values.insert(name, value.to_ascii_lowercase());
        }
        self
    }

    pub fn build(self) -> FlagState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::token::{MODE, OUTPUT_FORMAT, QUIET, VERBOSE};

    #[test]
    fn test_switches() {
        let state = FlagState::builder()
            .switch(VERBOSE, true)
            .switch(QUIET, false)
            .build();
        assert!(state.is_active(&FlagToken::Bare(VERBOSE)));
        assert!(!state.is_active(&FlagToken::Bare(QUIET)));
        assert!(!state.is_empty());
    }

    #[test]
    fn test_value_flag_contributes_two_tokens() {
        let state = FlagState::builder()
            .value(OUTPUT_FORMAT, Some(" JSON "))
            .build();
        assert!(state.is_active(&FlagToken::Bare(OUTPUT_FORMAT)));
        assert!(state.is_active(&FlagToken::ValueEquals(OUTPUT_FORMAT, "json")));
        assert!(!state.is_active(&FlagToken::ValueEquals(OUTPUT_FORMAT, "yaml")));
        assert_eq!(state.value(OUTPUT_FORMAT), Some("json"));
    }

    #[test]
    fn test_missing_or_blank_value_is_inactive() {
        let state = FlagState::builder()
            .value(MODE, None)
            .value(OUTPUT_FORMAT, Some("  "))
            .build();
        assert!(state.is_empty());
        assert!(!state.is_active(&FlagToken::Bare(MODE)));
        assert!(!state.is_active(&FlagToken::ValueEquals(OUTPUT_FORMAT, "")));
    }

    #[test]
    fn test_restricted_to() {
        let state = FlagState::builder()
            .switch(VERBOSE, true)
            .value(MODE, Some("i"))
            .build();
        let only_mode = state.restricted_to(&[MODE]);
        assert!(only_mode.is_set(MODE));
        assert!(!only_mode.is_set(VERBOSE));
        assert_eq!(only_mode.value(MODE), Some("i"));
    }

    #[test]
    fn test_active_among_preserves_order() {
        let state = FlagState::builder()
            .switch(QUIET, true)
            .switch(VERBOSE, true)
            .build();
        let tokens = [FlagToken::Bare(VERBOSE), FlagToken::Bare(QUIET)];
        let active: Vec<String> = state
            .active_among(&tokens)
            .iter()
            .map(|t| t.to_string())
            .collect();
        assert_eq!(active, vec!["--verbose", "--quiet"]);
    }
}
