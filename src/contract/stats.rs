//! Stats and history returned by the result store.
//!
//! The store exposes aggregated stats for three games and plain result
//! lists for the other three. [`summarize`] aggregates a result list into
//! the same [`GameStats`] shape, so callers never care which one they got.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::GameId;
use crate::scoring::round_to;

use super::payload::{GameMetrics, SubmissionPayload};

/// Entries kept for games whose stats endpoint caps the history.
pub const HISTORY_CAP: usize = 10;

/// A previously stored result as shown in the history table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Headline score (moves for the puzzle, milliseconds for reaction time).
    pub score: f64,

    /// Time in seconds, when the game records one.
    #[serde(default, alias = "time_taken_s", skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,

    /// Arithmetic difficulty level reached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u32>,

    /// Puzzle board size label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub puzzle_size: Option<String>,

    /// When the result was stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Aggregated stats plus history for one game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameStats {
    /// Best score (count or length games).
    #[serde(alias = "highest_correct")]
    pub highest_score: f64,

    /// Mean score, one decimal.
    #[serde(alias = "avg_correct")]
    pub average_score: f64,

    /// Number of stored results.
    pub total_plays: u64,

    /// Digit span: summed input time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time_ms: Option<u64>,

    /// Fastest time in seconds (puzzle and reaction time).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_time_s: Option<f64>,

    /// Fewest puzzle moves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_moves: Option<u64>,

    /// Past results.
    pub history: Vec<HistoryEntry>,
}

impl GameStats {
    /// Best score to beat, in the unit of [`GameMetrics::score`].
    ///
    /// `None` when nothing has been recorded yet.
    #[must_use]
    pub fn known_best(&self, game: GameId) -> Option<f64> {
        if self.total_plays == 0 {
            return None;
        }
        match game {
            GameId::SlidingPuzzle => self.min_moves.filter(|&m| m > 0).map(|m| {
                #[allow(clippy::cast_precision_loss)]
                let moves = m as f64;
                moves
            }),
            GameId::ReactionTime => self.best_time_s.map(|s| round_to(s * 1000.0, 0)),
            GameId::Arithmetic
            | GameId::DigitSpan
            | GameId::SequenceRecall
            | GameId::Interference => Some(self.highest_score),
        }
    }
}

/// A result as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResult {
    /// What was submitted.
    #[serde(flatten)]
    pub payload: SubmissionPayload,
    /// When the store accepted it.
    pub created_at: DateTime<Utc>,
}

impl StoredResult {
    fn history_entry(&self) -> HistoryEntry {
        let mut entry = HistoryEntry {
            score: self.payload.metrics.score(),
            time: None,
            difficulty: None,
            puzzle_size: None,
            created_at: Some(self.created_at),
        };
        match &self.payload.metrics {
            GameMetrics::Arithmetic(m) => {
                entry.time = Some(m.time_taken_s);
                entry.difficulty = Some(m.difficulty_level);
            }
            GameMetrics::DigitSpan(m) => {
                #[allow(clippy::cast_precision_loss)]
                let seconds = m.total_reaction_time_ms as f64 / 1000.0;
                entry.time = Some(round_to(seconds, 2));
            }
            GameMetrics::SlidingPuzzle(m) => {
                #[allow(clippy::cast_precision_loss)]
                let seconds = m.time_taken_s as f64;
                entry.time = Some(seconds);
                entry.puzzle_size = Some(m.puzzle_size.clone());
            }
            GameMetrics::Interference(m) => entry.time = Some(m.total_time_s),
            GameMetrics::SequenceRecall(_) | GameMetrics::ReactionTime(_) => {}
        }
        entry
    }
}

/// Aggregates stored results of `game` into stats.
///
/// Results for other games are ignored.
#[must_use]
pub fn summarize(game: GameId, results: &[StoredResult]) -> GameStats {
    let mine: Vec<&StoredResult> = results
        .iter()
        .filter(|r| r.payload.game() == game)
        .collect();
    let mut stats = GameStats {
        total_plays: mine.len() as u64,
        ..GameStats::default()
    };
    if mine.is_empty() {
        return stats;
    }

    let scores: Vec<f64> = mine.iter().map(|r| r.payload.metrics.score()).collect();
    #[allow(clippy::cast_precision_loss)]
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;

    let mut history: Vec<HistoryEntry> = mine.iter().map(|r| r.history_entry()).collect();
    // newest first, like the store's list endpoints
    history.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    match game {
        GameId::SlidingPuzzle => {
            stats.best_time_s = history
                .iter()
                .filter_map(|h| h.time)
                .min_by(f64::total_cmp)
                .map(|t| round_to(t, 2));
            stats.min_moves = mine
                .iter()
                .filter_map(|r| match &r.payload.metrics {
                    GameMetrics::SlidingPuzzle(m) => Some(u64::from(m.moves_made)),
                    _ => None,
                })
                .min();
            history.sort_by(|a, b| cmp_time_asc(a.time, b.time));
            history.truncate(HISTORY_CAP);
        }
        GameId::ReactionTime => {
            stats.highest_score = scores.iter().copied().fold(f64::INFINITY, f64::min);
            stats.average_score = round_to(mean, 1);
            stats.best_time_s = Some(round_to(stats.highest_score / 1000.0, 3));
        }
        GameId::Arithmetic => {
            stats.highest_score = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            stats.average_score = round_to(mean, 1);
            history.sort_by(|a, b| {
                b.score
                    .total_cmp(&a.score)
                    .then_with(|| cmp_time_asc(a.time, b.time))
            });
            history.truncate(HISTORY_CAP);
        }
        GameId::DigitSpan => {
            stats.highest_score = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            stats.average_score = round_to(mean, 1);
            stats.total_time_ms = Some(mine.iter().map(|r| r.payload.metrics.time_spent_ms()).sum());
        }
        GameId::SequenceRecall | GameId::Interference => {
            stats.highest_score = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            stats.average_score = round_to(mean, 1);
        }
    }
    stats.history = history;
    stats
}

/// Ascending by time with missing times last.
pub(crate) fn cmp_time_asc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::payload::{ArithmeticMetrics, PuzzleMetrics, ReactionMetrics};
    use crate::contract::self_report::SelfReportMatrix;
    use chrono::TimeZone;

    fn stored(metrics: GameMetrics, minute: u32) -> StoredResult {
        StoredResult {
            payload: SubmissionPayload::new(metrics, SelfReportMatrix::default()),
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 10, minute, 0).unwrap(),
        }
    }

    fn arithmetic(correct: u32, time: f64) -> GameMetrics {
        GameMetrics::Arithmetic(ArithmeticMetrics {
            total_correct: correct,
            time_taken_s: time,
            difficulty_level: 1,
        })
    }

    #[test]
    fn arithmetic_aggregates_and_orders() {
        let results = vec![
            stored(arithmetic(5, 10.0), 1),
            stored(arithmetic(5, 7.0), 2),
            stored(arithmetic(8, 20.0), 3),
        ];
        let stats = summarize(GameId::Arithmetic, &results);
        assert_eq!(stats.total_plays, 3);
        assert!((stats.highest_score - 8.0).abs() < f64::EPSILON);
        assert!((stats.average_score - 6.0).abs() < f64::EPSILON);
        let order: Vec<(f64, Option<f64>)> =
            stats.history.iter().map(|h| (h.score, h.time)).collect();
        assert_eq!(
            order,
            vec![(8.0, Some(20.0)), (5.0, Some(7.0)), (5.0, Some(10.0))]
        );
        assert_eq!(stats.known_best(GameId::Arithmetic), Some(8.0));
    }

    #[test]
    fn puzzle_history_by_time_capped() {
        let results: Vec<StoredResult> = (0..12)
            .map(|i| {
                stored(
                    GameMetrics::SlidingPuzzle(PuzzleMetrics {
                        time_taken_s: 100 - u64::from(i),
                        puzzle_size: "3x3".to_string(),
                        moves_made: 40 + i,
                    }),
                    i,
                )
            })
            .collect();
        let stats = summarize(GameId::SlidingPuzzle, &results);
        assert_eq!(stats.history.len(), HISTORY_CAP);
        assert_eq!(stats.history[0].time, Some(89.0));
        assert_eq!(stats.best_time_s, Some(89.0));
        assert_eq!(stats.min_moves, Some(40));
        assert_eq!(stats.known_best(GameId::SlidingPuzzle), Some(40.0));
    }

    #[test]
    fn reaction_best_time() {
        let results = vec![
            stored(GameMetrics::ReactionTime(ReactionMetrics { reaction_time_ms: 320 }), 1),
            stored(GameMetrics::ReactionTime(ReactionMetrics { reaction_time_ms: 250 }), 2),
        ];
        let stats = summarize(GameId::ReactionTime, &results);
        assert_eq!(stats.best_time_s, Some(0.25));
        assert_eq!(stats.known_best(GameId::ReactionTime), Some(250.0));
        // newest first
        assert!((stats.history[0].score - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_has_no_best() {
        let stats = summarize(GameId::DigitSpan, &[]);
        assert_eq!(stats.total_plays, 0);
        assert_eq!(stats.known_best(GameId::DigitSpan), None);
    }

    #[test]
    fn decodes_store_stats_documents() {
        let json = r#"{"highest_correct": 12, "avg_correct": 7.5, "total_plays": 4,
            "history": [{"score": 12, "time": 33.1, "difficulty": 3,
                         "created_at": "2025-03-01T10:00:00+00:00"}]}"#;
        let stats: GameStats = serde_json::from_str(json).unwrap();
        assert!((stats.highest_score - 12.0).abs() < f64::EPSILON);
        assert_eq!(stats.history[0].difficulty, Some(3));

        let json = r#"{"best_time_s": 41.0, "min_moves": 0, "total_plays": 0, "history": [
            {"score": 30, "time_taken_s": 41.0, "puzzle_size": "3x3"}]}"#;
        let stats: GameStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.history[0].time, Some(41.0));
        assert_eq!(stats.known_best(GameId::SlidingPuzzle), None);
    }

    #[test]
    fn missing_times_sort_last() {
        assert_eq!(cmp_time_asc(Some(1.0), None), Ordering::Less);
        assert_eq!(cmp_time_asc(None, Some(1.0)), Ordering::Greater);
        assert_eq!(cmp_time_asc(None, None), Ordering::Equal);
    }
}
