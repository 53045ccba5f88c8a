//! Error context enhancement utilities
//!
//! Attaches the operation (and, where known, the file) to foreign errors
//! so that they surface as `AppError` with a readable message.

use super::types::AppError;
use std::path::PathBuf;

/// Extension trait for adding context to error types
///
/// Similar to anyhow's context functionality, but producing typed errors.
pub trait ErrorContextExt<T> {
    /// Add operation context to the error
    fn with_context(self, operation: impl Into<String>) -> Result<T, AppError>;

    /// Add operation context with a closure (lazy evaluation)
    fn with_context_lazy<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;

    /// Add operation and file context, producing an I/O error
    fn in_file_operation(
        self,
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
    ) -> Result<T, AppError>;
}

impl<T, E> ErrorContextExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context(self, operation: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| {
            let operation = operation.into();
            AppError::Other {
                message: format!("{}: {}", operation, e),
                source: Some(Box::new(e)),
            }
        })
    }

    fn with_context_lazy<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let operation = f();
            AppError::Other {
                message: format!("{}: {}", operation, e),
                source: Some(Box::new(e)),
            }
        })
    }

    fn in_file_operation(
        self,
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
    ) -> Result<T, AppError> {
        self.map_err(|e| AppError::io_with_source(path, operation, e))
    }
}
