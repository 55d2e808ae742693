// src/main.rs

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use supply_insights::config::init_tracing;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);
    let cfg = cli.load_config()?;
    cli::run(cli, &cfg)
}
