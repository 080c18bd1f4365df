//! `rank` command: order a stats or history document.

use serde::Deserialize;

use crate::cli::args::{OutputFormat, RankArgs};
use crate::contract::{GameStats, HistoryEntry, RankedEntry, rank_history};
use crate::error::GamesError;

/// Accepted input shapes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RankInput {
    History(Vec<HistoryEntry>),
    Stats(GameStats),
}

impl RankInput {
    fn into_history(self) -> Vec<HistoryEntry> {
        match self {
            Self::History(entries) => entries,
            Self::Stats(stats) => stats.history,
        }
    }
}

/// Reads the document at `args.file` and prints its ranked history.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, or a JSON error if it
/// is neither a stats object nor a history array.
pub async fn run(args: &RankArgs) -> Result<(), GamesError> {
    let raw = tokio::fs::read(&args.file).await?;
    let ranked = rank_document(args.game, &raw)?;
    tracing::debug!(game = %args.game, entries = ranked.len(), "ranked history");

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ranked)?),
        OutputFormat::Human => {
            if ranked.is_empty() {
                println!("No results recorded.");
                return Ok(());
            }
            println!("{} leaderboard\n", args.game.title());
            for r in &ranked {
                let time = r
                    .entry
                    .time
                    .map_or_else(|| "-".to_string(), |t| format!("{t:.2}s"));
                println!("{:>3}. {:>8}  {time}", r.rank, r.entry.score);
            }
        }
    }
    Ok(())
}

/// Parses `raw` as a stats object or history array and ranks it.
///
/// # Errors
///
/// Returns a JSON error if `raw` matches neither shape.
pub fn rank_document(
    game: crate::game::GameId,
    raw: &[u8],
) -> Result<Vec<RankedEntry>, GamesError> {
    let input: RankInput = serde_json::from_slice(raw)?;
    Ok(rank_history(game, &input.into_history()))
}
