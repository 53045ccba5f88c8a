//! Generation mode resolution
//!
//! Precedence, each step short-circuiting:
//! 1. conflicting mode flags fail, except the two-signal force-flag case
//! 2. an explicit `--mode` value
//! 3. `--force-non-interactive` / `--non-interactive`
//! 4. `--force-interactive` / `--interactive`
//! 5. environment detection

use super::conflict::detect_conflicts;
use super::environment::{Detection, DetectionReason};
use super::flag_state::FlagState;
use super::token::{
    FORCE_INTERACTIVE, FORCE_NON_INTERACTIVE, INTERACTIVE, MODE, MODE_SIGNALS, NON_INTERACTIVE,
};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Mode names listed in diagnostics
pub const ACCEPTED_MODES: &[&str] = &["interactive", "non-interactive", "config-file"];

/// How the generation workflow gathers its inputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMode {
    /// Not resolved yet
    #[default]
    Auto,
    Interactive,
    NonInteractive,
    /// Inputs come from a saved configuration file
    Config,
}

impl GenerationMode {
    /// Normalize a `--mode` value against the alias table
    pub fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "interactive" | "i" => Ok(Self::Interactive),
            "non-interactive" | "noninteractive" | "ni" | "auto" => Ok(Self::NonInteractive),
            "config-file" | "config" | "file" | "cf" => Ok(Self::Config),
            _ => Err(AppError::validation(MODE, value.trim(), ACCEPTED_MODES)),
        }
    }
}

impl FromStr for GenerationMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Interactive => "interactive",
            Self::NonInteractive => "non-interactive",
            Self::Config => "config-file",
        };
        f.write_str(name)
    }
}

/// The five mode-deciding signals of one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeFlags {
    pub interactive: bool,
    pub non_interactive: bool,
    pub force_interactive: bool,
    pub force_non_interactive: bool,
    pub mode: Option<String>,
}

impl ModeFlags {
    pub fn flag_state(&self) -> FlagState {
        FlagState::builder()
            .switch(INTERACTIVE, self.interactive)
            .switch(NON_INTERACTIVE, self.non_interactive)
            .switch(FORCE_INTERACTIVE, self.force_interactive)
            .switch(FORCE_NON_INTERACTIVE, self.force_non_interactive)
            .value(MODE, self.mode.as_deref())
            .build()
    }

    fn explicit_mode(&self) -> Option<&str> {
        self.mode.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }
}

/// A force flag silently winning over one opposing signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForcedOverride {
    pub mode: GenerationMode,
    pub force: &'static str,
    /// The suppressed flag as typed, e.g. `--mode=config`
    pub suppressed: String,
}

/// The two-signal case where a force flag resolves a conflict.
///
/// Applies only when exactly two mode signals are active and exactly one of
/// them is a force flag opposing the other. Force against force stays fatal.
pub fn recoverable_override(state: &FlagState) -> Option<ForcedOverride> {
    let active: Vec<&'static str> = MODE_SIGNALS
        .iter()
        .copied()
        .filter(|name| state.is_set(name))
        .collect();
    if active.len() != 2 {
        return None;
    }

    let is_force = |name: &str| name == FORCE_INTERACTIVE || name == FORCE_NON_INTERACTIVE;
    let (force, other) = match (is_force(active[0]), is_force(active[1])) {
        (true, false) => (active[0], active[1]),
        (false, true) => (active[1], active[0]),
        _ => return None,
    };

    let (mode, beaten) = if force == FORCE_INTERACTIVE {
        (GenerationMode::Interactive, [NON_INTERACTIVE, MODE])
    } else {
        (GenerationMode::NonInteractive, [INTERACTIVE, MODE])
    };
    if !beaten.contains(&other) {
        return None;
    }

    let suppressed = match state.value(other) {
        Some(value) => format!("{}={}", other, value),
        None => other.to_string(),
    };
    Some(ForcedOverride {
        mode,
        force,
        suppressed,
    })
}

/// What decided the resolved mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeSource {
    ExplicitMode,
    Flag(&'static str),
    Forced(ForcedOverride),
    Environment(DetectionReason),
}

impl fmt::Display for ModeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExplicitMode => f.write_str("--mode"),
            Self::Flag(name) => f.write_str(name),
            Self::Forced(ov) => write!(f, "{} (overriding {})", ov.force, ov.suppressed),
            Self::Environment(reason) => write!(f, "environment ({})", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeResolution {
    pub mode: GenerationMode,
    pub source: ModeSource,
}

/// Resolves a [`GenerationMode`] from mode flags plus environment detection
#[derive(Debug, Clone, Copy)]
pub struct ModeResolver {
    detection: Detection,
}

impl ModeResolver {
    pub fn new(detection: Detection) -> Self {
        Self { detection }
    }

    pub fn resolve(&self, flags: &ModeFlags) -> AppResult<ModeResolution> {
        let state = flags.flag_state();
        let report = detect_conflicts(&state);

        if report.has_errors() {
            let Some(forced) = recoverable_override(&state) else {
                let (errors, _) = report.partition();
                return Err(AppError::Conflict { report: errors });
            };
            // An invalid mode string is reported even when it would be overridden.
            if let Some(value) = flags.explicit_mode() {
                GenerationMode::parse(value)?;
            }
            debug!(
                force = forced.force,
                suppressed = %forced.suppressed,
                mode = %forced.mode,
                "force flag overrides conflicting mode flag"
            );
            return Ok(ModeResolution {
                mode: forced.mode,
                source: ModeSource::Forced(forced),
            });
        }

        if let Some(value) = flags.explicit_mode() {
            return Ok(ModeResolution {
                mode: GenerationMode::parse(value)?,
                source: ModeSource::ExplicitMode,
            });
        }

        if flags.force_non_interactive || flags.non_interactive {
            let flag = if flags.force_non_interactive {
                FORCE_NON_INTERACTIVE
            } else {
                NON_INTERACTIVE
            };
            return Ok(ModeResolution {
                mode: GenerationMode::NonInteractive,
                source: ModeSource::Flag(flag),
            });
        }

        if flags.force_interactive || flags.interactive {
            let flag = if flags.force_interactive {
                FORCE_INTERACTIVE
            } else {
                INTERACTIVE
            };
            return Ok(ModeResolution {
                mode: GenerationMode::Interactive,
                source: ModeSource::Flag(flag),
            });
        }

        let mode = if self.detection.non_interactive {
            GenerationMode::NonInteractive
        } else {
            GenerationMode::Interactive
        };
        Ok(ModeResolution {
            mode,
            source: ModeSource::Environment(self.detection.reason),
        })
    }
}
