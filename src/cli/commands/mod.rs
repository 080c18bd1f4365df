//! CLI command dispatch and handlers.
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod config;
pub mod generate;
pub mod rank;
pub mod version;

use std::sync::Arc;

use crate::cli::args::{Cli, Commands, ConfigSubcommand};
use crate::config::{ConfigLoader, GamesConfig};
use crate::error::GamesError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the
/// dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), GamesError> {
    match cli.command {
        Commands::Generate(args) => {
            let config = effective_config(cli.config.as_deref())?;
            generate::run(&args, &config)
        }
        Commands::Rank(args) => rank::run(&args).await,
        Commands::Config(cmd) => match cmd.subcommand {
            ConfigSubcommand::Validate(args) => config::validate(&args),
            ConfigSubcommand::Show => {
                let config = effective_config(cli.config.as_deref())?;
                config::show(&config)
            }
        },
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// Loads the configuration at `path`, or the defaults when none is given.
///
/// Warnings are logged.
fn effective_config(path: Option<&std::path::Path>) -> Result<Arc<GamesConfig>, GamesError> {
    if let Some(path) = path {
        tracing::info!(config = %path.display(), "loading configuration");
    }
    let loaded = ConfigLoader::with_defaults().load_or_default(path)?;
    for warning in &loaded.warnings {
        tracing::warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }
    Ok(loaded.config)
}
