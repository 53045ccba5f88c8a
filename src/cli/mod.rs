//! CLI module providing command-line interface functionality
//!
//! Parsing, flag resolution and logging setup happen here, in that order,
//! before any handler runs.

pub mod commands;
pub mod context;
pub mod flags;
pub mod handlers;
pub mod output;

use crate::config::GenforgeDirs;
use crate::logging::init_logging;
use crate::resolve::environment::ProcessEnv;
use crate::resolve::{EnvironmentDetector, ResolvedRunConfig};
use anyhow::Result;
use clap::Parser;

pub use commands::{CacheAction, Cli, Commands, ConfigAction, GenerateArgs, GlobalArgs, ModeArgs};
pub use context::CliContext;
pub use handlers::CommandHandler;

pub struct CliApp;

impl CliApp {
    /// Parse command line arguments and execute the requested command
    pub async fn run() -> Result<()> {
        let cli = Cli::parse();
        let args: Vec<String> = std::env::args().collect();

        // Conflicts and invalid values abort here, before logging is set up
        let run = ResolvedRunConfig::resolve(
            flags::run_inputs(&cli, args),
            EnvironmentDetector::from_process(),
        )?;
        init_logging(&run)?;

        let dirs = GenforgeDirs::resolve(&ProcessEnv)?;
        let context = CliContext::new(run, dirs)?;
        CommandHandler::new(context).handle_command(cli.command).await
    }
}
