//! `cb` entry point.
//!
//! # Responsibility
//! - Resolve config and environment overrides, then start file logging.
//! - Dispatch one command against the nearest book and map the outcome to
//!   the process exit code.

mod cli;
mod commands;
mod config;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use collabbook_core::init_logging;
use render::Palette;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    let mut config = config::load_config(cli.config.as_deref())?;
    for warning in config::apply_env_overrides(&mut config, |key| std::env::var(key).ok()) {
        eprintln!("warning: {warning}");
    }

    if let Some(dir) = config.log_dir() {
        if let Err(err) = init_logging(config.log_level(), &dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let palette = Palette::new(config.display.color && !cli.no_color);
    let cwd = std::env::current_dir().context("Could not determine the current directory")?;
    let command = cli.command.unwrap_or_default();

    let output = commands::execute(command, &cwd, palette)?;
    print!("{}", output.text);
    Ok(output.ok)
}
