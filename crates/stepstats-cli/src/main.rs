use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod display;

use cli::{Cli, Command};
use config::{ConvertSettings, FileConfig, PreviewSettings};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("stepstats={}", level).parse()?)
                .add_directive(format!("stepstats_core={}", level).parse()?),
        )
        .init();

    let config = FileConfig::resolve(cli.config.as_deref())?;

    match cli.command {
        Command::Convert(args) => commands::convert::run(&ConvertSettings::resolve(&args, &config)?),
        Command::Preview(args) => commands::preview::run(&PreviewSettings::resolve(&args, &config)?),
    }
}
