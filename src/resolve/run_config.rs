//! The per-invocation resolved configuration
//!
//! Produced once, right after argument parsing, and handed to every
//! collaborator by reference. Nothing downstream reads global flags again.

use super::conflict::{detect_conflicts, ConflictReport};
use super::environment::{Detection, EnvironmentDetector};
use super::flag_state::FlagState;
use super::mode::{recoverable_override, ModeFlags, ModeResolution, ModeResolver};
use super::output::{resolve_output, resolve_output_format, OutputFlags, OutputFormat, OutputSettings};
use super::token::MODE_SIGNALS;
use crate::errors::{AppError, AppResult};

/// Everything the front end collected for one invocation
#[derive(Debug, Clone, Default)]
pub struct RunInputs {
    pub command: String,
    pub args: Vec<String>,
    pub flags: FlagState,
    pub output: OutputFlags,
    pub output_format: Option<String>,
    pub non_interactive: bool,
}

/// Reject the invocation if any error-severity rule fires.
///
/// Mode conflicts that the mode resolver can settle with a force flag are
/// let through. Returns the non-fatal conflicts for logging.
pub fn preflight(flags: &FlagState) -> AppResult<ConflictReport> {
    let (mut errors, rest) = detect_conflicts(flags).partition();
    if recoverable_override(&flags.restricted_to(&MODE_SIGNALS)).is_some() {
        errors.retain(|conflict| !conflict.rule.is_mode_rule());
    }
    if errors.is_empty() {
        Ok(rest)
    } else {
        Err(AppError::Conflict { report: errors })
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedRunConfig {
    pub command: String,
    pub args: Vec<String>,
    pub output: OutputSettings,
    pub format: OutputFormat,
    /// Value of the global `--non-interactive` flag
    pub non_interactive: bool,
    pub detection: Detection,
    /// Warning and info conflicts, logged once the logger is up
    pub warnings: ConflictReport,
}

impl ResolvedRunConfig {
    /// Run the full resolution pass: conflicts first, then output settings
    /// and environment detection.
    pub fn resolve(inputs: RunInputs, detector: EnvironmentDetector) -> AppResult<Self> {
        let warnings = preflight(&inputs.flags)?;
        let output = resolve_output(&inputs.output)?;
        let format = resolve_output_format(inputs.output_format.as_deref())?;
        let detection = detector.with_explicit_flag(inputs.non_interactive).detect();

        Ok(Self {
            command: inputs.command,
            args: inputs.args,
            output,
            format,
            non_interactive: inputs.non_interactive,
            detection,
            warnings,
        })
    }

    pub fn mode_resolver(&self) -> ModeResolver {
        ModeResolver::new(self.detection)
    }

    /// Resolve a generation mode; the global `--non-interactive` is folded in
    pub fn resolve_mode(&self, local: &ModeFlags) -> AppResult<ModeResolution> {
        let flags = ModeFlags {
            non_interactive: local.non_interactive || self.non_interactive,
            ..local.clone()
        };
        self.mode_resolver().resolve(&flags)
    }

    /// Whether prompts may be shown, ignoring per-command mode flags
    pub fn can_prompt(&self) -> bool {
        !self.detection.non_interactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::environment::{FixedTerminal, MapEnv, NON_INTERACTIVE_ENV};
    use crate::resolve::mode::GenerationMode;
    use crate::resolve::output::OutputLevel;
    use crate::resolve::token::*;

    fn tty() -> EnvironmentDetector {
        EnvironmentDetector::new(MapEnv::default(), FixedTerminal(true))
    }

    fn inputs(flags: FlagState, output: OutputFlags) -> RunInputs {
        RunInputs {
            command: "generate".to_string(),
            args: vec!["genforge".to_string(), "generate".to_string()],
            flags,
            output,
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_run() {
        let config = ResolvedRunConfig::resolve(RunInputs::default(), tty()).unwrap();
        assert_eq!(config.output.level, OutputLevel::Normal);
        assert_eq!(config.format, OutputFormat::Text);
        assert!(config.warnings.is_empty());
        assert!(config.can_prompt());
    }

    #[test]
    fn test_conflict_short_circuits_output_resolution() {
        // Output resolution alone would pick Debug for --debug --quiet ...
        let output = OutputFlags {
            debug: true,
            quiet: true,
            ..Default::default()
        };
        assert_eq!(resolve_output(&output).unwrap().level, OutputLevel::Debug);

        // ... but the conflict check runs first and aborts.
        let flags = FlagState::builder()
            .switch(DEBUG, true)
            .switch(QUIET, true)
            .build();
        let err = ResolvedRunConfig::resolve(inputs(flags, output), tty()).unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[test]
    fn test_conflict_reported_before_invalid_log_level() {
        let output = OutputFlags {
            verbose: true,
            quiet: true,
            log_level: Some("nope".to_string()),
            ..Default::default()
        };
        let flags = FlagState::builder()
            .switch(VERBOSE, true)
            .switch(QUIET, true)
            .value(LOG_LEVEL, Some("nope"))
            .build();
        let err = ResolvedRunConfig::resolve(inputs(flags, output), tty()).unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[test]
    fn test_warning_conflicts_are_kept() {
        let flags = FlagState::builder()
            .switch(QUIET, true)
            .value(OUTPUT_FORMAT, Some("json"))
            .build();
        let output = OutputFlags {
            quiet: true,
            ..Default::default()
        };
        let mut run = inputs(flags, output);
        run.output_format = Some("json".to_string());
        let config = ResolvedRunConfig::resolve(run, tty()).unwrap();
        assert_eq!(config.warnings.len(), 1);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_recoverable_mode_conflict_passes_preflight() {
        let flags = FlagState::builder()
            .switch(FORCE_INTERACTIVE, true)
            .switch(NON_INTERACTIVE, true)
            .build();
        assert!(preflight(&flags).unwrap().is_empty());

        let fatal = FlagState::builder()
            .switch(FORCE_INTERACTIVE, true)
            .switch(FORCE_NON_INTERACTIVE, true)
            .build();
        assert!(preflight(&fatal).is_err());
    }

    #[test]
    fn test_recoverable_mode_does_not_hide_output_conflicts() {
        let flags = FlagState::builder()
            .switch(FORCE_INTERACTIVE, true)
            .switch(NON_INTERACTIVE, true)
            .switch(VERBOSE, true)
            .switch(QUIET, true)
            .build();
        match preflight(&flags) {
            Err(AppError::Conflict { report }) => {
                assert_eq!(report.len(), 1);
                assert!(!report.conflicts()[0].rule.is_mode_rule());
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_global_non_interactive_folds_into_mode() {
        let run = RunInputs {
            non_interactive: true,
            ..Default::default()
        };
        let config = ResolvedRunConfig::resolve(run, tty()).unwrap();
        assert!(!config.can_prompt());
        let resolution = config.resolve_mode(&ModeFlags::default()).unwrap();
        assert_eq!(resolution.mode, GenerationMode::NonInteractive);

        let forced = ModeFlags {
            force_interactive: true,
            ..Default::default()
        };
        assert_eq!(
            config.resolve_mode(&forced).unwrap().mode,
            GenerationMode::Interactive
        );
    }

    #[test]
    fn test_env_override_detected() {
        let detector =
            EnvironmentDetector::new(MapEnv::new([(NON_INTERACTIVE_ENV, "true")]), FixedTerminal(true));
        let config = ResolvedRunConfig::resolve(RunInputs::default(), detector).unwrap();
        assert!(config.detection.non_interactive);
        assert_eq!(
            config.resolve_mode(&ModeFlags::default()).unwrap().mode,
            GenerationMode::NonInteractive
        );
    }

    #[test]
    fn test_invalid_output_format() {
        let run = RunInputs {
            output_format: Some("csv".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            ResolvedRunConfig::resolve(run, tty()),
            Err(AppError::Validation { .. })
        ));
    }
}
