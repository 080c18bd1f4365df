//! Drives one game session against real time and a result store.
//!
//! [`GameRunner`] owns a session machine, its RNG, its timers, and a
//! handle to the store. It stamps events with the session clock, turns
//! [`Effect`]s into armed or cancelled timers, feeds fired timers back into
//! the machine, and reports progress through tracing, metrics, and the
//! structured event stream.

pub mod clock;
pub mod timers;

pub use clock::Clock;
pub use timers::TimerSet;

use std::sync::Arc;

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::config::schema::GamesConfig;
use crate::contract::{GameStats, RankedEntry, SelfReportMatrix, SubmissionPayload, rank_history};
use crate::error::{GamesError, GeneratorError, SessionError, StoreError};
use crate::observability::metrics;
use crate::observability::{Event, EventEmitter};
use crate::session::{Effect, GameMachine, Millis};
use crate::store::ResultStore;

/// Runs one game machine.
#[derive(Debug)]
pub struct GameRunner<M: GameMachine, S: ResultStore> {
    session: M,
    rng: StdRng,
    clock: Clock,
    timers: TimerSet,
    store: Arc<S>,
    events: Arc<EventEmitter>,
    stats: Option<GameStats>,
    submitted: bool,
}

impl<M: GameMachine, S: ResultStore> GameRunner<M, S> {
    /// Creates a runner with an OS-seeded RNG.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidParameters`] if the game's section
    /// of `config` is unusable.
    pub fn new(config: &GamesConfig, store: Arc<S>) -> Result<Self, GeneratorError> {
        Self::with_rng(config, store, StdRng::from_os_rng())
    }

    /// Creates a runner with a seeded RNG, for reproducible content.
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new).
    pub fn with_seed(
        config: &GamesConfig,
        store: Arc<S>,
        seed: u64,
    ) -> Result<Self, GeneratorError> {
        Self::with_rng(config, store, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GamesConfig, store: Arc<S>, rng: StdRng) -> Result<Self, GeneratorError> {
        let clock = Clock::new();
        Ok(Self {
            session: M::from_config(config)?,
            rng,
            clock,
            timers: TimerSet::new(clock),
            store,
            events: Arc::new(EventEmitter::noop()),
            stats: None,
            submitted: false,
        })
    }

    /// Sends structured events to `events`.
    #[must_use]
    pub fn with_events(mut self, events: Arc<EventEmitter>) -> Self {
        self.events = events;
        self
    }

    /// The session as it stands.
    #[must_use]
    pub const fn session(&self) -> &M {
        &self.session
    }

    /// The current time on the session clock.
    #[must_use]
    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    /// Last stats fetched from the store, if any.
    #[must_use]
    pub const fn stats(&self) -> Option<&GameStats> {
        self.stats.as_ref()
    }

    /// History from the last fetched stats, best first.
    #[must_use]
    pub fn leaderboard(&self) -> Vec<RankedEntry> {
        self.stats
            .as_ref()
            .map(|s| rank_history(M::GAME, &s.history))
            .unwrap_or_default()
    }

    /// Timers armed and not yet delivered.
    #[must_use]
    pub const fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// Whether the current result has been accepted by the store.
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Starts or restarts a play-through.
    ///
    /// The best score from the last fetched stats becomes the session's
    /// known best. Returns whether the start was accepted.
    pub fn start(&mut self) -> bool {
        let known_best = self.stats.as_ref().and_then(|s| s.known_best(M::GAME));
        let accepted = self.dispatch(M::start_event(self.now(), known_best));
        if accepted {
            self.submitted = false;
            metrics::record_session_started(M::GAME);
            info!(game = %M::GAME, session = %self.session.header().id, ?known_best, "session started");
            self.events.emit(Event::SessionStarted {
                timestamp: Utc::now(),
                session: self.session.header().id,
                game: M::GAME,
                known_best,
            });
        }
        accepted
    }

    /// Applies `event` and carries out its effects.
    ///
    /// Returns whether the session accepted the event.
    pub fn dispatch(&mut self, event: M::Event) -> bool {
        let from = self.session.phase();
        let was_finished = self.session.is_finished();
        let scored_before = self.session.responses().len();

        let step = self.session.clone().apply(event, &mut self.rng);
        self.session = step.session;
        if !step.accepted {
            debug!(game = %M::GAME, phase = from, "event ignored");
            return false;
        }

        for effect in step.effects {
            match effect {
                Effect::CancelTimers => self.timers.cancel_all(),
                Effect::Schedule(scheduled) => self.timers.arm(scheduled),
            }
        }

        let to = self.session.phase();
        let id = self.session.header().id;
        if from != to {
            debug!(game = %M::GAME, from, to, "phase changed");
            self.events.emit(Event::PhaseChanged {
                timestamp: Utc::now(),
                session: id,
                game: M::GAME,
                from,
                to,
            });
        }

        let responses = self.session.responses();
        for response in responses.iter().skip(scored_before) {
            metrics::record_trial(M::GAME, response.correct, response.latency_ms);
            self.events.emit(Event::TrialScored {
                timestamp: Utc::now(),
                session: id,
                game: M::GAME,
                correct: response.correct,
                latency_ms: response.latency_ms,
            });
        }

        if !was_finished && self.session.is_finished() {
            if let Some(result) = self.session.metrics() {
                let new_best = self.session.header().new_best;
                metrics::record_session_finished(M::GAME);
                info!(game = %M::GAME, session = %id, score = result.score(), new_best, "session finished");
                self.events.emit(Event::SessionFinished {
                    timestamp: Utc::now(),
                    session: id,
                    game: M::GAME,
                    score: result.score(),
                    new_best,
                });
            }
        }

        true
    }

    /// Waits for the next pending timer and applies it.
    ///
    /// Returns `None` when no timer is pending, otherwise whether the
    /// session accepted the fired timer.
    pub async fn wait_timer(&mut self) -> Option<bool> {
        let fired = self.timers.next().await?;
        Some(self.dispatch(M::timer_event(fired)))
    }

    /// Abandons the session: cancels timers and returns to the initial
    /// state.
    pub fn teardown(&mut self) {
        self.dispatch(M::teardown_event());
        self.timers.cancel_all();
        self.submitted = false;
    }

    /// Fetches fresh stats from the store.
    ///
    /// On failure the previously fetched stats are kept.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] from the fetch.
    pub async fn refresh_stats(&mut self) -> Result<&GameStats, StoreError> {
        match self.store.fetch_stats(M::GAME).await {
            Ok(stats) => {
                debug!(game = %M::GAME, total_plays = stats.total_plays, "stats refreshed");
                self.events.emit(Event::StatsRefreshed {
                    timestamp: Utc::now(),
                    game: M::GAME,
                    total_plays: stats.total_plays,
                });
                Ok(&*self.stats.insert(stats))
            }
            Err(e) => {
                warn!(game = %M::GAME, error = %e, "failed to fetch stats");
                metrics::record_stats_fetch_failure(M::GAME);
                Err(e)
            }
        }
    }

    /// Submits the finished result with the player's self-report.
    ///
    /// On success the session's pending timers are cancelled, its
    /// post-submission event is applied, and stats are refreshed; a failed
    /// refresh is only logged. On failure the session keeps its result and
    /// the call may be repeated.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadySubmitted`] if this result was
    /// already stored, [`SessionError::NotFinished`] if there is no result
    /// yet, and [`GamesError::Store`] if the store rejected it.
    pub async fn submit(&mut self, self_report: SelfReportMatrix) -> Result<(), GamesError> {
        if self.submitted {
            return Err(SessionError::AlreadySubmitted { game: M::GAME }.into());
        }
        let Some(result) = self.session.metrics() else {
            return Err(SessionError::NotFinished {
                game: M::GAME,
                phase: self.session.phase(),
            }
            .into());
        };

        let id = self.session.header().id;
        let payload = SubmissionPayload::new(result, self_report);
        if let Err(e) = self.store.submit_result(&payload).await {
            warn!(game = %M::GAME, session = %id, error = %e, "result submission failed");
            metrics::record_submission(M::GAME, false);
            self.events.emit(Event::SubmissionFailed {
                timestamp: Utc::now(),
                session: id,
                game: M::GAME,
                error: e.to_string(),
            });
            return Err(e.into());
        }

        self.submitted = true;
        metrics::record_submission(M::GAME, true);
        info!(game = %M::GAME, session = %id, "result submitted");
        self.events.emit(Event::ResultSubmitted {
            timestamp: Utc::now(),
            session: id,
            game: M::GAME,
        });

        self.timers.cancel_all();
        if let Some(settled) = M::settled_event() {
            self.dispatch(settled);
        }
        // Refresh failures are logged inside and the old stats stay.
        let _ = self.refresh_stats().await;
        Ok(())
    }
}
