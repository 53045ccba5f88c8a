//! Logger setup driven by the resolved run configuration

use crate::errors::{AppError, AppResult};
use crate::resolve::{LogLevel, ResolvedRunConfig, Severity};
use tracing::{debug, info, warn};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

/// Root target of everything this crate logs
const CRATE_TARGET: &str = "genforge";

/// Target for non-fatal flag conflicts; kept visible even under `--quiet`
pub const CONFLICT_TARGET: &str = "genforge::conflicts";

fn level_filter(level: LogLevel) -> LevelFilter {
    level.directive().parse().unwrap_or(LevelFilter::INFO)
}

/// Level for other crates when `RUST_LOG` is unset: never chattier than warn
fn dependency_level(level: LogLevel) -> LevelFilter {
    level_filter(level).min(LevelFilter::WARN)
}

fn crate_directives(level: LogLevel) -> [String; 2] {
    [
        format!("{}={}", CRATE_TARGET, level.directive()),
        format!("{}=warn", CONFLICT_TARGET),
    ]
}

/// Build the filter: `RUST_LOG` for dependencies, the resolved level for
/// this crate
pub fn build_filter(run: &ResolvedRunConfig) -> EnvFilter {
    let level = run.output.log_level;
    let mut filter = EnvFilter::builder()
        .with_default_directive(dependency_level(level).into())
        .from_env_lossy();
    for directive in crate_directives(level) {
        if let Ok(directive) = directive.parse::<Directive>() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

/// Install the global subscriber. Logs go to stderr so stdout stays
/// reserved for command results.
pub fn init_logging(run: &ResolvedRunConfig) -> AppResult<()> {
    let settings = run.output;
    let show_target = settings.level == crate::resolve::OutputLevel::Debug;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(run))
        .with_writer(std::io::stderr)
        .with_target(show_target)
        .with_file(settings.log_caller)
        .with_line_number(settings.log_caller);

    let result = if settings.log_json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|_| AppError::unavailable("logger"))?;

    log_startup(run);
    Ok(())
}

/// Emit the conflict warnings and, in verbose/debug, the starting trace
pub fn log_startup(run: &ResolvedRunConfig) {
    for conflict in run.warnings.conflicts() {
        let rule = conflict.rule;
        match rule.severity {
            Severity::Info => info!(
                target: CONFLICT_TARGET,
                flags = %rule.flag_list(),
                suggestion = rule.suggestion,
                "{}",
                rule.description
            ),
            _ => warn!(
                target: CONFLICT_TARGET,
                flags = %rule.flag_list(),
                suggestion = rule.suggestion,
                "{}",
                rule.description
            ),
        }
    }

    if run.output.level.is_chatty() {
        debug!(
            command = %run.command,
            args = ?run.args,
            format = %run.format,
            non_interactive = run.detection.non_interactive,
            detection = %run.detection.reason,
            "starting command"
        );
    }
}
