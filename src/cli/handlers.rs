//! Command handlers for all CLI operations
//!
//! Each handler borrows the [`CliContext`]; routing happens here.

mod cache;
mod config;
mod generate;
mod project;
mod version;

use super::{CliContext, Commands};
use super::output::TextRender;
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

pub use cache::CacheHandler;
pub use config::ConfigHandler;
pub use generate::GenerateHandler;
pub use project::ProjectHandler;
pub use version::VersionHandler;

/// Coordinates all command handling operations
pub struct CommandHandler {
    context: CliContext,
}

impl CommandHandler {
    pub fn new(context: CliContext) -> Self {
        Self { context }
    }

    /// Route commands to their appropriate handlers
    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Generate(args) => GenerateHandler::new(&self.context).handle(args).await,
            Commands::Validate { dir, template } => {
                ProjectHandler::new(&self.context).handle_validate(&dir, &template)
            }
            Commands::Audit { dir, strict } => {
                ProjectHandler::new(&self.context).handle_audit(&dir, strict)
            }
            Commands::Cache { action } => CacheHandler::new(&self.context).handle(action),
            Commands::Config { action } => ConfigHandler::new(&self.context).handle(action),
            Commands::Version { check } => VersionHandler::new(&self.context).handle(check).await,
        }
    }
}

/// Outcome of a command that changes state
#[derive(Debug, Serialize)]
pub struct Done {
    pub action: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl TextRender for Done {
    fn render_text(&self) -> String {
        match &self.path {
            Some(path) => format!("{} '{}' ({})", self.action, self.name, path.display()),
            None => format!("{} '{}'", self.action, self.name),
        }
    }
}
