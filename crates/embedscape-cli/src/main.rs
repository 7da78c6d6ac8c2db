mod app;
mod cli;
mod commands;
mod embedding_helpers;
mod logging;
mod types;

use clap::Parser;

/// Main entry point for the embedscape CLI application.
fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    logging::init(&cli.cmd);
    app::run(cli)
}
