//! Centralized error handling module
//!
//! Typed errors for the whole crate. Command handlers work with
//! `anyhow::Result` at the edge and the CLI downcasts back to `AppError`
//! to pick the exit code.

pub mod context;
pub mod types;

pub use context::ErrorContextExt;
pub use types::{AppError, AppResult};

/// Convert from anyhow::Error to AppError, keeping typed errors intact
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<AppError>() {
            Ok(app_err) => app_err,
            Err(err) => AppError::Other {
                message: format!("{:#}", err),
                source: None,
            },
        }
    }
}
