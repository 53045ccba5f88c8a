//! Conflict rule table
//!
//! Each rule lists flags that must not be used together. Adding a rule is
//! a data change: the detector evaluates whatever this table contains.

use super::token::{
    FlagToken, DEBUG, FORCE_INTERACTIVE, FORCE_NON_INTERACTIVE, INTERACTIVE, MODE,
    NON_INTERACTIVE, OUTPUT_FORMAT, QUIET, VERBOSE,
};
use serde::Serialize;
use std::fmt;

/// How a triggered rule is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Aborts the command
    Error,
    /// Logged, the command continues
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(label)
    }
}

/// A set of mutually exclusive flags
#[derive(Debug, PartialEq, Eq)]
pub struct ConflictRule {
    /// At least two tokens; the rule fires when more than one is active
    pub flags: &'static [FlagToken],
    pub description: &'static str,
    pub suggestion: &'static str,
    pub examples: &'static [&'static str],
    pub severity: Severity,
}

impl ConflictRule {
    /// True when every token of the rule is a mode-deciding signal
    pub fn is_mode_rule(&self) -> bool {
        self.flags.iter().all(FlagToken::is_mode_signal)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Rule flags joined for display (`--verbose, --quiet`)
    pub fn flag_list(&self) -> String {
        self.flags
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The canonical rule table, in evaluation order
pub static CONFLICT_RULES: &[ConflictRule] = &[
    ConflictRule {
        flags: &[FlagToken::Bare(VERBOSE), FlagToken::Bare(QUIET)],
        description: "Cannot use verbose and quiet output at the same time",
        suggestion: "Choose --verbose for detailed output or --quiet for minimal output",
        examples: &["genforge generate --verbose", "genforge generate --quiet"],
        severity: Severity::Error,
    },
    ConflictRule {
        flags: &[FlagToken::Bare(DEBUG), FlagToken::Bare(QUIET)],
        description: "Cannot use debug and quiet output at the same time",
        suggestion: "Use --debug for troubleshooting or --quiet for minimal output, not both",
        examples: &["genforge generate --debug", "genforge generate --quiet"],
        severity: Severity::Error,
    },
    ConflictRule {
        flags: &[FlagToken::Bare(INTERACTIVE), FlagToken::Bare(NON_INTERACTIVE)],
        description: "Cannot request interactive and non-interactive mode at the same time",
        suggestion: "Choose either --interactive or --non-interactive",
        examples: &[
            "genforge generate --interactive",
            "genforge generate demo --non-interactive",
        ],
        severity: Severity::Error,
    },
    ConflictRule {
        flags: &[
            FlagToken::Bare(FORCE_INTERACTIVE),
            FlagToken::Bare(FORCE_NON_INTERACTIVE),
        ],
        description: "Cannot force both interactive and non-interactive mode",
        suggestion: "Use only one force flag",
        examples: &[
            "genforge generate --force-interactive",
            "genforge generate demo --force-non-interactive",
        ],
        severity: Severity::Error,
    },
    ConflictRule {
        flags: &[
            FlagToken::Bare(INTERACTIVE),
            FlagToken::Bare(FORCE_NON_INTERACTIVE),
        ],
        description: "Cannot request interactive mode while forcing non-interactive mode",
        suggestion: "Drop --interactive, or replace --force-non-interactive with --force-interactive",
        examples: &[
            "genforge generate --interactive",
            "genforge generate demo --force-non-interactive",
        ],
        severity: Severity::Error,
    },
    ConflictRule {
        flags: &[
            FlagToken::Bare(NON_INTERACTIVE),
            FlagToken::Bare(FORCE_INTERACTIVE),
        ],
        description: "Cannot request non-interactive mode while forcing interactive mode",
        suggestion: "Drop --non-interactive, or replace --force-interactive with --force-non-interactive",
        examples: &[
            "genforge generate demo --non-interactive",
            "genforge generate --force-interactive",
        ],
        severity: Severity::Error,
    },
    ConflictRule {
        flags: &[FlagToken::Bare(INTERACTIVE), FlagToken::Bare(MODE)],
        description: "Cannot combine --interactive with an explicit --mode",
        suggestion: "Use --mode=interactive on its own, or --interactive without --mode",
        examples: &[
            "genforge generate --mode=interactive",
            "genforge generate --interactive",
        ],
        severity: Severity::Error,
    },
    ConflictRule {
        flags: &[FlagToken::Bare(NON_INTERACTIVE), FlagToken::Bare(MODE)],
        description: "Cannot combine --non-interactive with an explicit --mode",
        suggestion: "Use --mode=non-interactive on its own, or --non-interactive without --mode",
        examples: &[
            "genforge generate demo --mode=non-interactive",
            "genforge generate demo --non-interactive",
        ],
        severity: Severity::Error,
    },
    ConflictRule {
        flags: &[FlagToken::Bare(FORCE_INTERACTIVE), FlagToken::Bare(MODE)],
        description: "Cannot combine --force-interactive with an explicit --mode",
        suggestion: "Drop --mode; --force-interactive already decides the mode",
        examples: &["genforge generate --force-interactive"],
        severity: Severity::Error,
    },
    ConflictRule {
        flags: &[FlagToken::Bare(FORCE_NON_INTERACTIVE), FlagToken::Bare(MODE)],
        description: "Cannot combine --force-non-interactive with an explicit --mode",
        suggestion: "Drop --mode; --force-non-interactive already decides the mode",
        examples: &["genforge generate demo --force-non-interactive"],
        severity: Severity::Error,
    },
    ConflictRule {
        flags: &[
            FlagToken::ValueEquals(OUTPUT_FORMAT, "json"),
            FlagToken::Bare(QUIET),
        ],
        description: "JSON output with --quiet may hide progress context around the JSON document",
        suggestion: "Drop --quiet if you need progress messages; the JSON result is still printed",
        examples: &["genforge validate ./demo --output-format=json"],
        severity: Severity::Warning,
    },
];
