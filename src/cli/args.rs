//! CLI argument definitions.
//!
//! All Clap derive structs for `soulcare-games` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::game::GameId;
use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Cognitive mini-game engine for self-assessment games.
#[derive(Parser, Debug)]
#[command(name = "soulcare-games", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the games configuration file.
    #[arg(short, long, global = true, env = "SOULCARE_GAMES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "SOULCARE_GAMES_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true)]
    pub log_format: LogFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draw one stimulus for a game.
    Generate(GenerateArgs),

    /// Rank a stats or history document by a game's leaderboard rule.
    Rank(RankArgs),

    /// Validate or print the games configuration.
    Config(ConfigCommand),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Generate / Rank
// ============================================================================

/// Arguments for `generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Game to draw a stimulus for.
    pub game: GameId,

    /// Seed for reproducible output.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `rank`.
#[derive(Args, Debug)]
pub struct RankArgs {
    /// Game whose ranking rule applies.
    pub game: GameId,

    /// JSON file holding a stats object or a bare history array.
    pub file: PathBuf,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// Config Command
// ============================================================================

/// Configuration commands.
#[derive(Args, Debug)]
pub struct ConfigCommand {
    /// Config subcommand.
    #[command(subcommand)]
    pub subcommand: ConfigSubcommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Validate configuration files.
    Validate(ConfigValidateArgs),

    /// Print the effective configuration as YAML.
    Show,
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
pub struct ConfigValidateArgs {
    /// Configuration files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Treat warnings as errors.
    #[arg(long)]
    pub strict: bool,
}

// ============================================================================
// Version
// ============================================================================

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

// ============================================================================
// Tests
// ============================================================================
