//! Error types for genforge
//!
//! Every failure the tool can surface is one of these variants. Flag
//! resolution failures (`Conflict`, `Validation`) are raised before any
//! command work starts; the rest come from the collaborators.

use crate::resolve::ConflictReport;
use std::path::PathBuf;
use thiserror::Error;

/// Boxed source error carried by most variants
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    // Flag resolution errors
    #[error("{}", report.render())]
    Conflict { report: ConflictReport },

    #[error("Invalid value '{value}' for {flag}. Accepted values: {}", accepted.join(", "))]
    Validation {
        flag: String,
        value: String,
        accepted: Vec<String>,
    },

    #[error("Initialization error: {component} is not available")]
    ConfigurationUnavailable { component: String },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgument { argument: String, reason: String },

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    // Generation errors
    #[error("Template error: {message}")]
    Template {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("Generation failed: {message}")]
    Generation { message: String },

    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    // Cache errors
    #[error("Cache error: {message}")]
    Cache {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    // I/O errors
    #[error("File I/O error for '{path}': {operation}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: Option<BoxedSource>,
    },

    // Serialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        context: String,
        #[source]
        source: Option<BoxedSource>,
    },

    // Network errors
    #[error("Network error for {url}: {reason}")]
    Network {
        url: String,
        reason: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("{message}")]
    Other {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a validation error for a flag value
    pub fn validation(
        flag: impl Into<String>,
        value: impl Into<String>,
        accepted: &[&str],
    ) -> Self {
        Self::Validation {
            flag: flag.into(),
            value: value.into(),
            accepted: accepted.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn unavailable(component: impl Into<String>) -> Self {
        Self::ConfigurationUnavailable {
            component: component.into(),
        }
    }

    /// Create a new Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new Config error with source
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Create a new Template error
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new Template error with source
    pub fn template_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Template {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    pub fn prompt(message: impl Into<String>) -> Self {
        Self::Prompt {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
            source: None,
        }
    }

    pub fn cache_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Cache {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new I/O error
    pub fn io(path: impl Into<PathBuf>, operation: impl Into<String>) -> Self {
        Self::Io {
            path: path.into(),
            operation: operation.into(),
            source: None,
        }
    }

    /// Create a new I/O error with source
    pub fn io_with_source(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Io {
            path: path.into(),
            operation: operation.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn serialization(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Serialization {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn network(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            reason: reason.into(),
            source: None,
        }
    }

    /// Whether the error was raised while resolving flags, before any work ran
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::Conflict { .. } | Self::Validation { .. } | Self::InvalidArgument { .. }
        )
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        if self.is_usage_error() {
            2
        } else {
            1
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Conflict { .. } => "conflict",
            Self::Validation { .. } | Self::InvalidArgument { .. } => "validation",
            Self::ConfigurationUnavailable { .. } => "initialization",
            Self::Config { .. } => "config",
            Self::NotFound { .. } => "lookup",
            Self::Template { .. } | Self::Generation { .. } | Self::Prompt { .. } => "generation",
            Self::Cache { .. } => "cache",
            Self::Io { .. } => "io",
            Self::Serialization { .. } => "serialization",
            Self::Network { .. } => "network",
            Self::Other { .. } => "internal",
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let operation = match err.kind() {
            std::io::ErrorKind::NotFound => "file not found",
            std::io::ErrorKind::PermissionDenied => "permission denied",
            std::io::ErrorKind::AlreadyExists => "already exists",
            _ => "I/O operation",
        }
        .to_string();

        Self::Io {
            path: PathBuf::from("unknown"),
            operation,
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        let context = if err.is_syntax() {
            format!("JSON syntax error at line {} column {}", err.line(), err.column())
        } else if err.is_eof() {
            "unexpected end of JSON input".to_string()
        } else {
            "JSON data error".to_string()
        };
        Self::serialization(context, err)
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::serialization("YAML error", err)
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::serialization(format!("TOML parse error: {}", err.message()), err)
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        Self::serialization("TOML serialization error", err)
    }
}

impl From<handlebars::RenderError> for AppError {
    fn from(err: handlebars::RenderError) -> Self {
        Self::template_with_source("render failed", err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let reason = if err.is_timeout() {
            "request timed out".to_string()
        } else if let Some(status) = err.status() {
            format!("HTTP {}", status.as_u16())
        } else if err.is_connect() {
            "connection failed".to_string()
        } else {
            "request failed".to_string()
        };
        Self::Network {
            url,
            reason,
            source: Some(Box::new(err)),
        }
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        Self::config_with_source("invalid URL", err)
    }
}
