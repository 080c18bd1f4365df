//! `soulcare-games` - cognitive mini-game engine

use clap::Parser;

use soulcare_games::cli::args::Cli;
use soulcare_games::cli::commands;
use soulcare_games::error::ExitCode;
use soulcare_games::observability::{describe_metrics, init_logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(cli.log_format, cli.verbose, cli.color);
    }
    describe_metrics();

    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\ninterrupted");
            std::process::exit(ExitCode::INTERRUPTED);
        }
    });

    match commands::dispatch(cli).await {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
