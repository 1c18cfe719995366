mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{congress_start_year, districts, labels, states};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log to stderr; `RUST_LOG` overrides the level chosen by `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Districts(args) => districts::run(&cli, args),
        Commands::States(args) => states::run(&cli, args),
        Commands::Labels(args) => labels::run(&cli, args),
        Commands::CongressStartYear(args) => congress_start_year::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
