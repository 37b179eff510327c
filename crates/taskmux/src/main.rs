//! Taskmux - Concurrent task runner for markdown task documents

mod cli;
mod exit_codes;

use clap::Parser;

use cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.execute()
}
