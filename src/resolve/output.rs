//! Output level and format resolution

use super::token::{LOG_LEVEL, OUTPUT_FORMAT};
use crate::errors::{AppError, AppResult};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const ACCEPTED_LOG_LEVELS: &[&str] = &["debug", "info", "warn", "error", "fatal"];
pub const ACCEPTED_OUTPUT_FORMATS: &[&str] = &["text", "json", "yaml"];

/// Verbosity of the run. Precedence: Debug > Verbose > Quiet > Normal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputLevel {
    Debug,
    Verbose,
    Quiet,
    #[default]
    Normal,
}

impl OutputLevel {
    pub fn from_flags(debug: bool, verbose: bool, quiet: bool) -> Self {
        if debug {
            Self::Debug
        } else if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    /// Verbose or Debug
    pub fn is_chatty(&self) -> bool {
        matches!(self, Self::Debug | Self::Verbose)
    }

    pub fn is_quiet(&self) -> bool {
        *self == Self::Quiet
    }
}

/// Levels accepted by `--log-level`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    /// Accepted for compatibility; filters like `error`
    Fatal,
}

impl LogLevel {
    /// The `tracing` filter directive for this level
    pub fn directive(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error | Self::Fatal => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            _ => Err(AppError::validation(LOG_LEVEL, s.trim(), ACCEPTED_LOG_LEVELS)),
        }
    }
}

/// How command results are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            _ => Err(AppError::validation(
                OUTPUT_FORMAT,
                s.trim(),
                ACCEPTED_OUTPUT_FORMATS,
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Yaml => "yaml",
        })
    }
}

/// Raw verbosity-related flags of one invocation
#[derive(Debug, Clone, Default)]
pub struct OutputFlags {
    pub debug: bool,
    pub verbose: bool,
    pub quiet: bool,
    pub log_level: Option<String>,
    pub log_json: bool,
    pub log_caller: bool,
}

/// Resolved logging configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutputSettings {
    pub level: OutputLevel,
    pub log_level: LogLevel,
    pub log_json: bool,
    pub log_caller: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            level: OutputLevel::Normal,
            log_level: LogLevel::Info,
            log_json: false,
            log_caller: false,
        }
    }
}

/// Derive the output level and effective log level.
///
/// `--debug`, `--verbose` and `--quiet` decide the log level on their own;
/// `--log-level` only applies at Normal level, but is validated regardless.
pub fn resolve_output(flags: &OutputFlags) -> AppResult<OutputSettings> {
    let requested = match flags.log_level.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => value.parse::<LogLevel>()?,
        _ => LogLevel::Info,
    };

    let level = OutputLevel::from_flags(flags.debug, flags.verbose, flags.quiet);
    let log_level = match level {
        OutputLevel::Debug => LogLevel::Trace,
        OutputLevel::Verbose => LogLevel::Debug,
        OutputLevel::Quiet => LogLevel::Error,
        OutputLevel::Normal => requested,
    };

    Ok(OutputSettings {
        level,
        log_level,
        log_json: flags.log_json,
        log_caller: flags.log_caller,
    })
}

/// Parse `--output-format`, defaulting to text when absent
pub fn resolve_output_format(value: Option<&str>) -> AppResult<OutputFormat> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => value.parse(),
        _ => Ok(OutputFormat::Text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(debug: bool, verbose: bool, quiet: bool) -> OutputFlags {
        OutputFlags {
            debug,
            verbose,
            quiet,
            ..Default::default()
        }
    }

    #[test]
    fn test_precedence() {
        assert_eq!(OutputLevel::from_flags(true, true, true), OutputLevel::Debug);
        assert_eq!(OutputLevel::from_flags(false, true, true), OutputLevel::Verbose);
        assert_eq!(OutputLevel::from_flags(false, false, true), OutputLevel::Quiet);
        assert_eq!(OutputLevel::from_flags(false, false, false), OutputLevel::Normal);
    }

    #[test]
    fn test_debug_beats_quiet_when_resolved_directly() {
        let settings = resolve_output(&flags(true, false, true)).unwrap();
        assert_eq!(settings.level, OutputLevel::Debug);
        assert_eq!(settings.log_level, LogLevel::Trace);
    }

    #[test]
    fn test_log_level_applies_at_normal() {
        let settings = resolve_output(&OutputFlags {
            log_level: Some("WARN".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(settings.level, OutputLevel::Normal);
        assert_eq!(settings.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_log_level_ignored_when_flag_decides() {
        let settings = resolve_output(&OutputFlags {
            verbose: true,
            log_level: Some("error".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(settings.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_default_is_info() {
        let settings = resolve_output(&OutputFlags::default()).unwrap();
        assert_eq!(settings, OutputSettings::default());
    }

    #[test]
    fn test_invalid_log_level() {
        let err = resolve_output(&OutputFlags {
            log_level: Some("chatty".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value 'chatty' for --log-level. Accepted values: debug, info, warn, error, fatal"
        );
    }

    #[test]
    fn test_fatal_maps_to_error_directive() {
        assert_eq!(LogLevel::Fatal.directive(), "error");
        assert_eq!("fatal".parse::<LogLevel>().unwrap(), LogLevel::Fatal);
    }

    #[test]
    fn test_output_format() {
        assert_eq!(resolve_output_format(None).unwrap(), OutputFormat::Text);
        assert_eq!(resolve_output_format(Some("JSON")).unwrap(), OutputFormat::Json);
        assert_eq!(resolve_output_format(Some("yaml")).unwrap(), OutputFormat::Yaml);
        let err = resolve_output_format(Some("xml")).unwrap_err();
        assert!(err.to_string().contains("text, json, yaml"));
    }

    #[test]
    fn test_toggles_pass_through() {
        let settings = resolve_output(&OutputFlags {
            log_json: true,
            log_caller: true,
            ..Default::default()
        })
        .unwrap();
        assert!(settings.log_json);
        assert!(settings.log_caller);
    }
}
