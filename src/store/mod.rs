//! The external result store.
//!
//! [`ResultStore`] is the seam between sessions and persistence. Two
//! implementations ship: [`HttpResultStore`] talks to the mental-games REST
//! API, and [`InMemoryStore`] keeps results in process for tests and
//! offline play.

pub mod http;
pub mod memory;

pub use http::HttpResultStore;
pub use memory::InMemoryStore;

use async_trait::async_trait;

use crate::contract::{DashboardSummary, GameStats, SubmissionPayload};
use crate::error::StoreError;
use crate::game::GameId;

/// Persists finished results and serves aggregated statistics.
#[async_trait]
pub trait ResultStore: Send + Sync + std::fmt::Debug {
    /// Stores one finished result.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store did not accept the result. The
    /// caller keeps the payload and may retry.
    async fn submit_result(&self, payload: &SubmissionPayload) -> Result<(), StoreError>;

    /// Fetches stats and history for `game`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport, status, or decoding failures.
    async fn fetch_stats(&self, game: GameId) -> Result<GameStats, StoreError>;

    /// Fetches the cross-game dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport, status, or decoding failures.
    async fn fetch_dashboard(&self) -> Result<DashboardSummary, StoreError>;
}
