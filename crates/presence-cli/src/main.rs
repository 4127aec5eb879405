mod cli;
mod commands;
mod config;
mod logging;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::config::PresenceConfig;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Duration(args) => commands::duration(args),
        Command::Calendar(args) => commands::calendar(args),
        Command::Status(args) => {
            let config = PresenceConfig::load(cli.config.as_deref())?;
            commands::status(args, &config)
        }
        Command::Audit(args) => {
            let config = PresenceConfig::load(cli.config.as_deref())?;
            commands::audit(args, &config)
        }
    }
}
