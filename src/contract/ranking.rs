//! Leaderboard ranking of history entries.

use std::cmp::Ordering;

use serde::Serialize;

use crate::game::GameId;

use super::stats::{HistoryEntry, cmp_time_asc};

/// A history entry with its 1-based rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    /// Position on the leaderboard, starting at 1.
    pub rank: usize,
    /// The entry.
    #[serde(flatten)]
    pub entry: HistoryEntry,
}

/// Orders two entries by the leaderboard rule for `game`.
///
/// - count and length games: score descending, then time ascending
/// - sliding puzzle: time ascending, then moves ascending
/// - reaction time: milliseconds ascending
///
/// Missing times sort after present ones.
#[must_use]
pub fn compare(game: GameId, a: &HistoryEntry, b: &HistoryEntry) -> Ordering {
    match game {
        GameId::Arithmetic | GameId::SequenceRecall | GameId::DigitSpan | GameId::Interference => {
            b.score
                .total_cmp(&a.score)
                .then_with(|| cmp_time_asc(a.time, b.time))
        }
        GameId::SlidingPuzzle => {
            cmp_time_asc(a.time, b.time).then_with(|| a.score.total_cmp(&b.score))
        }
        GameId::ReactionTime => a.score.total_cmp(&b.score),
    }
}

/// Ranks `entries` 1..N. Ties keep their input order.
#[must_use]
pub fn rank_history(game: GameId, entries: &[HistoryEntry]) -> Vec<RankedEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| compare(game, a, b));
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, entry)| RankedEntry { rank: i + 1, entry })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: f64, time: Option<f64>) -> HistoryEntry {
        HistoryEntry {
            score,
            time,
            difficulty: None,
            puzzle_size: None,
            created_at: None,
        }
    }

    fn pairs(ranked: &[RankedEntry]) -> Vec<(usize, f64, Option<f64>)> {
        ranked
            .iter()
            .map(|r| (r.rank, r.entry.score, r.entry.time))
            .collect()
    }

    #[test]
    fn arithmetic_score_desc_time_asc() {
        let entries = vec![
            entry(5.0, Some(10.0)),
            entry(5.0, Some(7.0)),
            entry(8.0, Some(20.0)),
        ];
        assert_eq!(
            pairs(&rank_history(GameId::Arithmetic, &entries)),
            vec![
                (1, 8.0, Some(20.0)),
                (2, 5.0, Some(7.0)),
                (3, 5.0, Some(10.0))
            ]
        );
    }

    #[test]
    fn puzzle_time_then_moves() {
        let entries = vec![
            entry(40.0, Some(60.0)),
            entry(35.0, Some(60.0)),
            entry(20.0, None),
            entry(50.0, Some(45.0)),
        ];
        assert_eq!(
            pairs(&rank_history(GameId::SlidingPuzzle, &entries)),
            vec![
                (1, 50.0, Some(45.0)),
                (2, 35.0, Some(60.0)),
                (3, 40.0, Some(60.0)),
                (4, 20.0, None)
            ]
        );
    }

    #[test]
    fn missing_time_after_present_on_score_tie() {
        let entries = vec![entry(6.0, None), entry(6.0, Some(12.0))];
        let ranked = rank_history(GameId::DigitSpan, &entries);
        assert_eq!(ranked[0].entry.time, Some(12.0));
        assert_eq!(ranked[1].entry.time, None);
    }

    #[test]
    fn reaction_fastest_first_ties_stable() {
        let mut first = entry(300.0, None);
        first.difficulty = Some(1);
        let mut second = entry(300.0, None);
        second.difficulty = Some(2);
        let entries = vec![first, entry(210.0, None), second];
        let ranked = rank_history(GameId::ReactionTime, &entries);
        assert!((ranked[0].entry.score - 210.0).abs() < f64::EPSILON);
        assert_eq!(ranked[1].entry.difficulty, Some(1));
        assert_eq!(ranked[2].entry.difficulty, Some(2));
    }

    #[test]
    fn ranked_entry_serializes_flat() {
        let ranked = rank_history(GameId::SequenceRecall, &[entry(4.0, None)]);
        let json = serde_json::to_value(&ranked[0]).unwrap();
        assert_eq!(json["rank"], 1);
        assert_eq!(json["score"], 4.0);
    }
}
