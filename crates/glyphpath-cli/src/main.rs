//! Glyphpath CLI - lay out text and dump its outlines

mod cli;

mod commands {
    pub mod info;
    pub mod outline;
}

use clap::Parser;

use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Outline(args) => commands::outline::run(args),
    }
}
