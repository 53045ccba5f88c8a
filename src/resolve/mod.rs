//! Mode & flag resolution
//!
//! Turns command-line flags, environment variables and terminal detection
//! into one [`GenerationMode`] and one [`OutputLevel`], rejecting
//! contradictory flag combinations before any command work starts.
//!
//! Dependency order, leaves first:
//! - [`environment`] - non-interactive detection
//! - [`token`], [`flag_state`] - the flag snapshot
//! - [`rules`] - the conflict rule table
//! - [`conflict`] - detection and diagnostics
//! - [`mode`], [`output`] - the two resolvers
//! - [`run_config`] - the assembled [`ResolvedRunConfig`]

pub mod conflict;
pub mod environment;
pub mod flag_state;
pub mod mode;
pub mod output;
pub mod rules;
pub mod run_config;
pub mod token;

pub use conflict::{detect_conflicts, Conflict, ConflictReport};
pub use environment::{Detection, DetectionReason, EnvironmentDetector};
pub use flag_state::FlagState;
pub use mode::{GenerationMode, ModeFlags, ModeResolution, ModeResolver, ModeSource};
pub use output::{LogLevel, OutputFlags, OutputFormat, OutputLevel, OutputSettings};
pub use rules::{ConflictRule, Severity, CONFLICT_RULES};
pub use run_config::{preflight, ResolvedRunConfig, RunInputs};
pub use token::FlagToken;
