//! Flag tokens
//!
//! A token names either a switch (`--verbose`) or a specific value of a
//! value-carrying flag (`--mode=interactive`). Rules and flag state speak
//! in tokens so that a rule can target "any use of `--mode`" as well as
//! "`--mode` set to one particular value".

use std::fmt;

pub const VERBOSE: &str = "--verbose";
pub const QUIET: &str = "--quiet";
pub const DEBUG: &str = "--debug";
pub const LOG_LEVEL: &str = "--log-level";
pub const LOG_JSON: &str = "--log-json";
pub const LOG_CALLER: &str = "--log-caller";
pub const OUTPUT_FORMAT: &str = "--output-format";
pub const INTERACTIVE: &str = "--interactive";
pub const NON_INTERACTIVE: &str = "--non-interactive";
pub const FORCE_INTERACTIVE: &str = "--force-interactive";
pub const FORCE_NON_INTERACTIVE: &str = "--force-non-interactive";
pub const MODE: &str = "--mode";

/// The five flags that decide a generation mode
pub const MODE_SIGNALS: [&str; 5] = [
    NON_INTERACTIVE,
    INTERACTIVE,
    FORCE_INTERACTIVE,
    FORCE_NON_INTERACTIVE,
    MODE,
];

/// A canonical flag reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FlagToken {
    /// Any use of the flag
    Bare(&'static str),
    /// The flag carrying exactly this value (compared case-insensitively)
    ValueEquals(&'static str, &'static str),
}

impl FlagToken {
    /// The flag name without any value qualifier
    pub fn name(&self) -> &'static str {
        match self {
            FlagToken::Bare(name) | FlagToken::ValueEquals(name, _) => name,
        }
    }

    pub fn is_force(&self) -> bool {
        matches!(self.name(), FORCE_INTERACTIVE | FORCE_NON_INTERACTIVE)
    }

    /// Whether this token is one of the mode-deciding signals
    pub fn is_mode_signal(&self) -> bool {
        MODE_SIGNALS.contains(&self.name())
    }
}

impl fmt::Display for FlagToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagToken::Bare(name) => write!(f, "{}", name),
            FlagToken::ValueEquals(name, value) => write!(f, "{}={}", name, value),
        }
    }
}
