//! Cross-game dashboard summary.

use serde::{Deserialize, Serialize};

use crate::game::GameId;
use crate::scoring::round_to;

use super::payload::GameMetrics;
use super::stats::StoredResult;

/// Reference maxima used to turn best scores into a success percentage.
const SEQUENCE_REFERENCE: f64 = 10.0;
const INTERFERENCE_REFERENCE: f64 = 20.0;
const DIGIT_SPAN_REFERENCE: f64 = 12.0;
const ARITHMETIC_REFERENCE: f64 = 100.0;

/// Per-game summary block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSummary {
    /// Results stored for the game.
    pub total_plays: u64,
    /// Best headline score, if any result exists.
    #[serde(
        skip_serializing_if = "Option::is_none",
        alias = "best_time_ms",
        alias = "max_sequence_length",
        alias = "max_number_length",
        alias = "highest_correct",
        alias = "min_moves"
    )]
    pub best: Option<f64>,
    /// Best score as a percentage of the reference maximum, for games
    /// that count towards the success rate.
    #[serde(
        skip_serializing_if = "Option::is_none",
        alias = "best_correct_percentage"
    )]
    pub success_pct: Option<f64>,
}

/// Totals across every game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSummary {
    /// Results stored across all games.
    pub total_games_played: u64,
    /// Mean of the per-game success percentages, one decimal.
    pub average_success_rate: f64,
    /// Time spent playing in hours, one decimal.
    pub total_time_spent_h: f64,
    /// Per-game blocks keyed by metric label (e.g. `stroop_game`).
    pub summary: std::collections::BTreeMap<String, GameSummary>,
}

/// Builds the dashboard from every stored result.
#[must_use]
pub fn summarize_dashboard(results: &[StoredResult]) -> DashboardSummary {
    let mut dashboard = DashboardSummary::default();
    let mut rates = Vec::new();
    let mut total_ms: u64 = 0;

    for game in GameId::ALL {
        let metrics: Vec<&GameMetrics> = results
            .iter()
            .map(|r| &r.payload.metrics)
            .filter(|m| m.game() == game)
            .collect();
        let mut block = GameSummary {
            total_plays: metrics.len() as u64,
            ..GameSummary::default()
        };
        if !metrics.is_empty() {
            let scores = metrics.iter().map(|m| m.score());
            block.best = match game {
                GameId::ReactionTime | GameId::SlidingPuzzle => scores.reduce(f64::min),
                _ => scores.reduce(f64::max),
            };
            let reference = match game {
                GameId::SequenceRecall => Some(SEQUENCE_REFERENCE),
                GameId::Interference => Some(INTERFERENCE_REFERENCE),
                GameId::DigitSpan => Some(DIGIT_SPAN_REFERENCE),
                GameId::Arithmetic => Some(ARITHMETIC_REFERENCE),
                GameId::ReactionTime | GameId::SlidingPuzzle => None,
            };
            if let (Some(best), Some(reference)) = (block.best, reference) {
                let pct = (best / reference * 100.0).min(100.0);
                block.success_pct = Some(pct);
                rates.push(pct);
            }
            total_ms = total_ms.saturating_add(metrics.iter().map(|m| m.time_spent_ms()).sum());
            dashboard.total_games_played += block.total_plays;
        }
        dashboard.summary.insert(game.label().to_string(), block);
    }

    if !rates.is_empty() {
        #[allow(clippy::cast_precision_loss)]
        let mean = rates.iter().sum::<f64>() / rates.len() as f64;
        dashboard.average_success_rate = round_to(mean, 1);
    }
    #[allow(clippy::cast_precision_loss)]
    let hours = total_ms as f64 / 1000.0 / 3600.0;
    dashboard.total_time_spent_h = round_to(hours, 1);
    dashboard
}
