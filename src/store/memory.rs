//! In-process result store.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use crate::contract::{
    DashboardSummary, GameStats, StoredResult, SubmissionPayload, summarize, summarize_dashboard,
};
use crate::error::StoreError;
use crate::game::GameId;

use super::ResultStore;

/// Result store backed by a concurrent map.
///
/// Failures can be injected to exercise retry paths.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    results: DashMap<GameId, Vec<StoredResult>>,
    failing_submits: AtomicUsize,
    failing_fetches: AtomicBool,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` submissions fail.
    pub fn fail_next_submits(&self, count: usize) {
        self.failing_submits.store(count, Ordering::SeqCst);
    }

    /// Makes every fetch fail until called again with `false`.
    pub fn fail_fetches(&self, failing: bool) {
        self.failing_fetches.store(failing, Ordering::SeqCst);
    }

    /// Results stored for `game`, oldest first.
    #[must_use]
    pub fn submissions(&self, game: GameId) -> Vec<StoredResult> {
        self.results
            .get(&game)
            .map(|r| r.value().clone())
            .unwrap_or_default()
    }

    fn all(&self) -> Vec<StoredResult> {
        self.results
            .iter()
            .flat_map(|entry| entry.value().clone())
            .collect()
    }

    fn check_fetch(&self) -> Result<(), StoreError> {
        if self.failing_fetches.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("fetches disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ResultStore for InMemoryStore {
    async fn submit_result(&self, payload: &SubmissionPayload) -> Result<(), StoreError> {
        let failed = self
            .failing_submits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(StoreError::Unavailable("submission rejected".to_string()));
        }
        self.results
            .entry(payload.game())
            .or_default()
            .push(StoredResult {
                payload: payload.clone(),
                created_at: Utc::now(),
            });
        Ok(())
    }

    async fn fetch_stats(&self, game: GameId) -> Result<GameStats, StoreError> {
        self.check_fetch()?;
        Ok(summarize(game, &self.submissions(game)))
    }

    async fn fetch_dashboard(&self) -> Result<DashboardSummary, StoreError> {
        self.check_fetch()?;
        Ok(summarize_dashboard(&self.all()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{GameMetrics, PuzzleMetrics, SelfReportMatrix};

    fn puzzle(moves: u32) -> SubmissionPayload {
        SubmissionPayload::new(
            GameMetrics::SlidingPuzzle(PuzzleMetrics {
                time_taken_s: 40,
                puzzle_size: "3x3".to_string(),
                moves_made: moves,
            }),
            SelfReportMatrix::default(),
        )
    }

    #[tokio::test]
    async fn submit_then_fetch() {
        let store = InMemoryStore::new();
        store.submit_result(&puzzle(31)).await.unwrap();
        store.submit_result(&puzzle(24)).await.unwrap();

        let stats = store.fetch_stats(GameId::SlidingPuzzle).await.unwrap();
        assert_eq!(stats.total_plays, 2);
        assert_eq!(stats.min_moves, Some(24));
        assert_eq!(stats.known_best(GameId::SlidingPuzzle), Some(24.0));

        let other = store.fetch_stats(GameId::Arithmetic).await.unwrap();
        assert_eq!(other.total_plays, 0);

        let dashboard = store.fetch_dashboard().await.unwrap();
        assert_eq!(dashboard.total_games_played, 2);
    }

    #[tokio::test]
    async fn injected_failures() {
        let store = InMemoryStore::new();
        store.fail_next_submits(1);
        assert!(store.submit_result(&puzzle(10)).await.is_err());
        assert!(store.submit_result(&puzzle(10)).await.is_ok());
        assert_eq!(store.submissions(GameId::SlidingPuzzle).len(), 1);

        store.fail_fetches(true);
        assert!(store.fetch_stats(GameId::SlidingPuzzle).await.is_err());
        assert!(store.fetch_dashboard().await.is_err());
        store.fail_fetches(false);
        assert!(store.fetch_stats(GameId::SlidingPuzzle).await.is_ok());
    }
}
