use anyhow::Result;
use clap::Parser;
use std::io;
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::workflow::Session;

mod cli;
mod config;
mod logging;
mod plotting;
mod workflow;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = AppConfig::resolve(&cli)?;
    let registry = config.load_registry()?;
    let preferences = config.open_preferences();
    debug!(methods = registry.methods().len(), "catalog ready");

    let mut session = Session::new(registry, config, preferences);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Command::List => session.list(&mut out),
        Command::Show(args) => session.show(args, &mut out),
        Command::Calc(args) => session.calc(args, &mut out),
        Command::Guide(args) => session.guide(args, &mut out),
        Command::Chart(args) => session.chart(args, &mut out),
        Command::Favorite { method } => session.favorite(method, &mut out),
        Command::Units { system } => session.units_command(*system, &mut out),
        Command::Tds(args) => session.tds(args, &mut out),
        Command::Share(args) => session.share(args, &mut out),
        Command::Decode { query } => session.decode(query, &mut out),
    }
}
