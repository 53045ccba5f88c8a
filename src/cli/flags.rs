//! Snapshot of the parsed flags for resolution

use super::commands::{Cli, Commands, GlobalArgs, ModeArgs};
use crate::errors::{AppError, AppResult};
use crate::resolve::token::*;
use crate::resolve::{FlagState, ModeFlags, OutputFlags, RunInputs};
use std::collections::BTreeMap;

fn mode_args(command: &Commands) -> Option<&ModeArgs> {
    match command {
        Commands::Generate(args) => Some(&args.mode),
        _ => None,
    }
}

/// Every flag the conflict rules know about, global and per-command
pub fn flag_state(cli: &Cli) -> FlagState {
    let g = &cli.global;
    let mut builder = FlagState::builder()
        .switch(VERBOSE, g.verbose)
        .switch(QUIET, g.quiet)
        .switch(DEBUG, g.debug)
        .switch(LOG_JSON, g.log_json)
        .switch(LOG_CALLER, g.log_caller)
        .switch(NON_INTERACTIVE, g.non_interactive)
        .value(LOG_LEVEL, g.log_level.as_deref())
        .value(OUTPUT_FORMAT, g.output_format.as_deref());

    if let Some(mode) = mode_args(&cli.command) {
        builder = builder
            .switch(INTERACTIVE, mode.interactive)
            .switch(FORCE_INTERACTIVE, mode.force_interactive)
            .switch(FORCE_NON_INTERACTIVE, mode.force_non_interactive)
            .value(MODE, mode.mode.as_deref());
    }
    builder.build()
}

pub fn output_flags(global: &GlobalArgs) -> OutputFlags {
    OutputFlags {
        debug: global.debug,
        verbose: global.verbose,
        quiet: global.quiet,
        log_level: global.log_level.clone(),
        log_json: global.log_json,
        log_caller: global.log_caller,
    }
}

/// Per-command mode flags; the global `--non-interactive` is folded in later
pub fn mode_flags(args: &ModeArgs) -> ModeFlags {
    ModeFlags {
        interactive: args.interactive,
        non_interactive: false,
        force_interactive: args.force_interactive,
        force_non_interactive: args.force_non_interactive,
        mode: args.mode.clone(),
    }
}

pub fn run_inputs(cli: &Cli, args: Vec<String>) -> RunInputs {
    RunInputs {
        command: cli.command.path(),
        args,
        flags: flag_state(cli),
        output: output_flags(&cli.global),
        output_format: cli.global.output_format.clone(),
        non_interactive: cli.global.non_interactive,
    }
}

/// Parse repeated `--var KEY=VALUE` arguments
pub fn parse_vars(vars: &[String]) -> AppResult<BTreeMap<String, String>> {
    vars.iter()
        .map(|raw| {
            let (key, value) = raw
                .split_once('=')
                .ok_or_else(|| AppError::invalid_argument("--var", format!("'{}' is not KEY=VALUE", raw)))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(AppError::invalid_argument("--var", format!("'{}' has an empty key", raw)));
            }
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}
