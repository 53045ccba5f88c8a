//! Command definitions and structures for the CLI
//!
//! Global flags are declared once on [`Cli`] with `global = true`, so they
//! are accepted before or after the subcommand.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "genforge")]
#[command(about = "Project generator with strict flag resolution")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Show progress details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print results and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Show everything, including internal tracing
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Log level when no verbosity flag is given (debug, info, warn, error, fatal)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Include source file and line in log lines
    #[arg(long, global = true)]
    pub log_caller: bool,

    /// Never prompt
    #[arg(long, global = true)]
    pub non_interactive: bool,

    /// Result format (text, json, yaml)
    #[arg(long, global = true, value_name = "FORMAT")]
    pub output_format: Option<String>,
}

/// Flags that choose how `generate` gathers its inputs
#[derive(Args, Debug, Clone, Default)]
pub struct ModeArgs {
    /// Prompt for missing values
    #[arg(long)]
    pub interactive: bool,

    /// Prompt even when a non-interactive signal is present
    #[arg(long)]
    pub force_interactive: bool,

    /// Never prompt, overriding an interactive signal
    #[arg(long)]
    pub force_non_interactive: bool,

    /// interactive, non-interactive or config-file
    #[arg(long, value_name = "MODE")]
    pub mode: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scaffold a new project from a template
    Generate(GenerateArgs),

    /// Check that a generated project has every file its template declares
    Validate {
        /// Project directory
        dir: PathBuf,

        /// Template the project was generated from
        #[arg(short, long, default_value = "basic")]
        template: String,
    },

    /// Scan a project for leftover placeholders, empty files and TODOs
    Audit {
        /// Project directory
        dir: PathBuf,

        /// Treat warnings as failures
        #[arg(long)]
        strict: bool,
    },

    /// Manage the render cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Manage saved configurations
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    Version {
        /// Ask the release server for a newer version
        #[arg(long)]
        check: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Project name
    pub name: Option<String>,

    #[command(flatten)]
    pub mode: ModeArgs,

    /// Template to use (basic, cli, library)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Output directory (defaults to ./<NAME>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    #[arg(long)]
    pub license: Option<String>,

    /// Saved configuration file to generate from
    #[arg(long, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Name of a saved configuration to generate from
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Write into a non-empty output directory
    #[arg(short, long)]
    pub force: bool,

    /// List the files without writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Extra template variable
    #[arg(long = "var", value_name = "KEY=VALUE")]
    pub vars: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show entry count, size and hit rate
    Stats,

    /// Remove every cached render
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Reconcile the cache index with the files on disk
    Repair,

    /// Print the cache directory
    Path,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// List saved configurations
    List,

    /// Show a saved configuration
    View { name: String },

    /// Save a configuration for later `generate --profile`
    Save {
        name: String,

        #[arg(short, long, default_value = "basic")]
        template: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        license: Option<String>,

        #[arg(long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,

        /// Replace an existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Delete a saved configuration
    Delete {
        name: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Write a saved configuration to a file or stdout
    Export {
        name: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Store a configuration from a TOML file
    Import {
        file: PathBuf,

        /// Store under a different name
        #[arg(long)]
        name: Option<String>,

        /// Replace an existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

impl Commands {
    /// Dotted command path used in logs, e.g. `cache.stats`
    pub fn path(&self) -> String {
        match self {
            Self::Generate(_) => "generate".to_string(),
            Self::Validate { .. } => "validate".to_string(),
            Self::Audit { .. } => "audit".to_string(),
            Self::Cache { action } => format!(
                "cache.{}",
                match action {
                    CacheAction::Stats => "stats",
                    CacheAction::Clear { .. } => "clear",
                    CacheAction::Repair => "repair",
                    CacheAction::Path => "path",
                }
            ),
            Self::Config { action } => format!(
                "config.{}",
                match action {
                    ConfigAction::List => "list",
                    ConfigAction::View { .. } => "view",
                    ConfigAction::Save { .. } => "save",
                    ConfigAction::Delete { .. } => "delete",
                    ConfigAction::Export { .. } => "export",
                    ConfigAction::Import { .. } => "import",
                }
            ),
            Self::Version { .. } => "version".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["genforge", "cache", "stats", "--quiet", "--log-json"]).unwrap();
        assert!(cli.global.quiet);
        assert!(cli.global.log_json);
        assert_eq!(cli.command.path(), "cache.stats");
    }

    #[test]
    fn test_generate_mode_flags() {
        let cli = Cli::try_parse_from([
            "genforge",
            "generate",
            "demo",
            "--force-interactive",
            "--mode",
            "config",
            "--var",
            "port=8080",
        ])
        .unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.name.as_deref(), Some("demo"));
        assert!(args.mode.force_interactive);
        assert_eq!(args.mode.mode.as_deref(), Some("config"));
        assert_eq!(args.vars, vec!["port=8080"]);
    }

    #[test]
    fn test_mode_value_is_not_validated_by_clap() {
        // Resolution reports invalid modes with the accepted list
        let cli = Cli::try_parse_from(["genforge", "generate", "--mode=bogus"]);
        assert!(cli.is_ok());
    }
}
