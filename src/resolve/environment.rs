//! Environment detection: should this run be non-interactive?
//!
//! The answer comes from an ordered list of checks, first match wins:
//! the explicit `--non-interactive` flag, the `GENFORGE_NON_INTERACTIVE`
//! variable, CI heuristics, and finally whether stdin is a terminal.
//! Environment and terminal access sit behind traits so every check can be
//! exercised with fakes.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::io::IsTerminal;

/// Boolean override variable for non-interactive runs
pub const NON_INTERACTIVE_ENV: &str = "GENFORGE_NON_INTERACTIVE";

/// Variables set by common CI providers
const CI_VARIABLES: &[&str] = &[
    "CI",
    "CONTINUOUS_INTEGRATION",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
    "BUILDKITE",
    "TF_BUILD",
    "TEAMCITY_VERSION",
    "BUILD_NUMBER",
];

/// Read access to environment variables
pub trait EnvSource: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A fixed set of variables
#[derive(Debug, Default, Clone)]
pub struct MapEnv(HashMap<String, String>);

impl MapEnv {
    pub fn new<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}

/// Answers whether standard input is attached to a terminal
pub trait TerminalProbe: Send + Sync {
    fn stdin_is_terminal(&self) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StdinProbe;

impl TerminalProbe for StdinProbe {
    fn stdin_is_terminal(&self) -> bool {
        std::io::stdin().is_terminal()
    }
}

/// A probe with a predetermined answer
#[derive(Debug, Clone, Copy)]
pub struct FixedTerminal(pub bool);

impl TerminalProbe for FixedTerminal {
    fn stdin_is_terminal(&self) -> bool {
        self.0
    }
}

/// Parse a boolean string: `true|1|yes|on` and `false|0|no|off`
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean variable, falling back to `default` when unset or unrecognized
pub fn env_bool(env: &dyn EnvSource, key: &str, default: bool) -> bool {
    env.var(key)
        .and_then(|value| parse_bool(&value))
        .unwrap_or(default)
}

/// Whether any known CI variable is set to something other than a falsy value
pub fn is_ci(env: &dyn EnvSource) -> bool {
    CI_VARIABLES.iter().any(|key| match env.var(key) {
        Some(value) => !value.trim().is_empty() && parse_bool(&value) != Some(false),
        None => false,
    })
}

/// Which check decided the outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionReason {
    ExplicitFlag,
    EnvOverride,
    Ci,
    PipedStdin,
    /// No check matched: interactive
    Terminal,
}

impl fmt::Display for DetectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ExplicitFlag => "explicit-flag",
            Self::EnvOverride => "env-override",
            Self::Ci => "ci",
            Self::PipedStdin => "piped-stdin",
            Self::Terminal => "terminal",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub non_interactive: bool,
    pub reason: DetectionReason,
}

impl Detection {
    pub fn interactive() -> Self {
        Self {
            non_interactive: false,
            reason: DetectionReason::Terminal,
        }
    }

    pub fn non_interactive(reason: DetectionReason) -> Self {
        Self {
            non_interactive: true,
            reason,
        }
    }
}

type Check<'a> = (DetectionReason, Box<dyn Fn() -> bool + 'a>);

pub struct EnvironmentDetector {
    env: Box<dyn EnvSource>,
    terminal: Box<dyn TerminalProbe>,
    explicit_flag: bool,
}

impl EnvironmentDetector {
    pub fn new(env: impl EnvSource + 'static, terminal: impl TerminalProbe + 'static) -> Self {
        Self {
            env: Box::new(env),
            terminal: Box::new(terminal),
            explicit_flag: false,
        }
    }

    /// Detector over the real environment and stdin
    pub fn from_process() -> Self {
        Self::new(ProcessEnv, StdinProbe)
    }

    /// Record whether `--non-interactive` was passed
    pub fn with_explicit_flag(mut self, non_interactive: bool) -> Self {
        self.explicit_flag = non_interactive;
        self
    }

    fn checks(&self) -> Vec<Check<'_>> {
        let explicit_flag: Box<dyn Fn() -> bool + '_> = Box::new(move || self.explicit_flag);
        let env_override: Box<dyn Fn() -> bool + '_> =
            Box::new(move || env_bool(&*self.env, NON_INTERACTIVE_ENV, false));
        let ci: Box<dyn Fn() -> bool + '_> = Box::new(move || is_ci(&*self.env));
        let piped_stdin: Box<dyn Fn() -> bool + '_> =
            Box::new(move || !self.terminal.stdin_is_terminal());

        vec![
            (DetectionReason::ExplicitFlag, explicit_flag),
            (DetectionReason::EnvOverride, env_override),
            (DetectionReason::Ci, ci),
            (DetectionReason::PipedStdin, piped_stdin),
        ]
    }

    /// Run the checks in order and report the first that matched
    pub fn detect(&self) -> Detection {
        self.checks()
            .into_iter()
            .find(|(_, check)| check())
            .map(|(reason, _)| Detection::non_interactive(reason))
            .unwrap_or_else(Detection::interactive)
    }
}

impl fmt::Debug for EnvironmentDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentDetector")
            .field("explicit_flag", &self.explicit_flag)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector(vars: &[(&str, &str)], tty: bool) -> EnvironmentDetector {
        EnvironmentDetector::new(MapEnv::new(vars.iter().copied()), FixedTerminal(tty))
    }

    #[test]
    fn test_parse_bool() {
        for truthy in ["true", "1", "yes", "on", " TRUE ", "On"] {
            assert_eq!(parse_bool(truthy), Some(true), "{}", truthy);
        }
        for falsy in ["false", "0", "no", "off", "NO"] {
            assert_eq!(parse_bool(falsy), Some(false), "{}", falsy);
        }
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_env_bool_default() {
        let env = MapEnv::new([("A", "sure"), ("B", "off")]);
        assert!(env_bool(&env, "A", true));
        assert!(!env_bool(&env, "A", false));
        assert!(!env_bool(&env, "B", true));
        assert!(env_bool(&env, "MISSING", true));
    }

    #[test]
    fn test_ci_detection() {
        assert!(is_ci(&MapEnv::new([("CI", "true")])));
        assert!(is_ci(&MapEnv::new([("GITHUB_ACTIONS", "true")])));
        assert!(is_ci(&MapEnv::new([("JENKINS_URL", "http://ci.local")])));
        assert!(!is_ci(&MapEnv::new([("CI", "false")])));
        assert!(!is_ci(&MapEnv::new([("CI", "")])));
        assert!(!is_ci(&MapEnv::default()));
    }

    #[test]
    fn test_terminal_without_signals_is_interactive() {
        let detection = detector(&[], true).detect();
        assert_eq!(detection, Detection::interactive());
    }

    #[test]
    fn test_piped_stdin_is_non_interactive() {
        let detection = detector(&[], false).detect();
        assert!(detection.non_interactive);
        assert_eq!(detection.reason, DetectionReason::PipedStdin);
    }

    #[test]
    fn test_explicit_flag_wins_first() {
        let detection = detector(&[(NON_INTERACTIVE_ENV, "1"), ("CI", "1")], false)
            .with_explicit_flag(true)
            .detect();
        assert_eq!(detection.reason, DetectionReason::ExplicitFlag);
    }

    #[test]
    fn test_env_override_before_ci() {
        let detection = detector(&[(NON_INTERACTIVE_ENV, "yes"), ("CI", "1")], true).detect();
        assert_eq!(detection.reason, DetectionReason::EnvOverride);
    }

    #[test]
    fn test_falsy_override_falls_through_to_ci() {
        let detection = detector(&[(NON_INTERACTIVE_ENV, "no"), ("CI", "1")], true).detect();
        assert_eq!(detection.reason, DetectionReason::Ci);
    }

    #[test]
    fn test_unrecognized_override_uses_default() {
        assert!(
            !detector(&[(NON_INTERACTIVE_ENV, "perhaps")], true)
                .detect()
                .non_interactive
        );
    }

    #[test]
    fn test_reason_display_matches_serialized_name() {
        for reason in [
            DetectionReason::ExplicitFlag,
            DetectionReason::EnvOverride,
            DetectionReason::Ci,
            DetectionReason::PipedStdin,
            DetectionReason::Terminal,
        ] {
            let serialized = serde_json::to_value(reason).unwrap();
            assert_eq!(serialized, reason.to_string());
        }
    }
}
