//! Result and history contract with the external store.
//!
//! - [`payload`]: per-game metric sets merged with the self-report matrix
//! - [`stats`]: aggregated stats and history as returned by the store
//! - [`ranking`]: leaderboard ordering of history entries
//! - [`dashboard`]: cross-game summary
//! - [`self_report`]: the post-session questionnaire

pub mod dashboard;
pub mod payload;
pub mod ranking;
pub mod self_report;
pub mod stats;

pub use dashboard::{DashboardSummary, GameSummary, summarize_dashboard};
pub use payload::{
    ArithmeticMetrics, DigitSpanMetrics, GameMetrics, InterferenceMetrics, PuzzleMetrics,
    ReactionMetrics, SequenceMetrics, SubmissionPayload,
};
pub use ranking::{RankedEntry, rank_history};
pub use self_report::{Mood, SelfReportMatrix};
pub use stats::{GameStats, HistoryEntry, StoredResult, summarize};
