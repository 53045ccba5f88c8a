//! genforge library
//!
//! Project generator whose command line is resolved up front: contradictory
//! flags are rejected, and one generation mode plus one output level are
//! derived from flags, environment and terminal detection.

pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod generator;
pub mod logging;
pub mod prompt;
pub mod resolve;
pub mod version;

// Re-export commonly used types for convenience
pub use config::{ConfigManager, GenforgeDirs, Settings};
pub use errors::{AppError, AppResult};
pub use resolve::{GenerationMode, OutputLevel, ResolvedRunConfig};
