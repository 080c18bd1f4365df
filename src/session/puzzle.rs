//! Sliding-tile puzzle session.
//!
//! ```text
//! initial ─start─▶ playing ─solving move─▶ finished
//! ```
//!
//! Misses do not exist here: a click on a tile that is not next to the
//! blank is simply not a move.

use rand::Rng;

use crate::config::schema::GamesConfig;
use crate::contract::{GameMetrics, PuzzleMetrics};
use crate::error::GeneratorError;
use crate::game::GameId;
use crate::generator::{Board, PuzzleGenerator, StimulusGenerator};
use crate::scoring;

use super::{Effect, FiredTimer, GameMachine, Millis, Response, SessionHeader, Step};

/// Events accepted by [`PuzzleSession`].
#[derive(Debug, Clone)]
pub enum PuzzleEvent {
    /// Start or play again.
    Start {
        /// Event time.
        at: Millis,
        /// Fewest known moves.
        known_best: Option<f64>,
    },
    /// A timer expired. The puzzle arms none, so this is always ignored.
    Timer(FiredTimer),
    /// The player clicked a cell.
    Move {
        /// Row-major index of the clicked cell.
        index: usize,
        /// Event time.
        at: Millis,
    },
    /// Leave the game.
    Teardown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Initial,
    Playing,
    Finished,
}

/// One sliding-puzzle play-through.
#[derive(Debug, Clone)]
pub struct PuzzleSession {
    header: SessionHeader,
    state: State,
    boards: PuzzleGenerator,
    board: Board,
    moves: u32,
    elapsed_s: u64,
}

impl PuzzleSession {
    /// The current board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Moves made so far.
    #[must_use]
    pub const fn moves(&self) -> u32 {
        self.moves
    }

    /// Seconds from start to the solving move, once finished.
    #[must_use]
    pub const fn elapsed_s(&self) -> u64 {
        self.elapsed_s
    }
}

impl GameMachine for PuzzleSession {
    type Event = PuzzleEvent;

    const GAME: GameId = GameId::SlidingPuzzle;

    fn from_config(config: &GamesConfig) -> Result<Self, GeneratorError> {
        let boards = PuzzleGenerator::new(config.sliding_puzzle.size)?;
        Ok(Self {
            header: SessionHeader::new(),
            state: State::Initial,
            board: Board::solved(boards.size()),
            boards,
            moves: 0,
            elapsed_s: 0,
        })
    }

    fn header(&self) -> &SessionHeader {
        &self.header
    }

    fn phase(&self) -> &'static str {
        match self.state {
            State::Initial => "initial",
            State::Playing => "playing",
            State::Finished => "finished",
        }
    }

    fn is_finished(&self) -> bool {
        self.state == State::Finished
    }

    fn apply<R: Rng + ?Sized>(mut self, event: PuzzleEvent, rng: &mut R) -> Step<Self> {
        match (event, self.state) {
            (PuzzleEvent::Start { at, known_best }, State::Initial | State::Finished) => {
                self.header.restart(at, known_best);
                self.board = self.boards.generate(rng);
                self.moves = 0;
                self.elapsed_s = 0;
                self.state = State::Playing;
                Step::accepted(self, vec![Effect::CancelTimers])
            }
            (PuzzleEvent::Move { index, at }, State::Playing) => {
                if !self.board.slide(index) {
                    return Step::ignored(self);
                }
                self.moves += 1;
                if self.board.is_solved() {
                    let started = self.header.started_at.unwrap_or(at);
                    self.elapsed_s = scoring::rounded_seconds(at.since(started));
                    self.header.finished_at = Some(at);
                    self.header.new_best = scoring::is_new_best(
                        Self::GAME,
                        f64::from(self.moves),
                        self.header.known_best,
                    );
                    self.state = State::Finished;
                }
                Step::accepted(self, Vec::new())
            }
            (PuzzleEvent::Teardown, _) => {
                self.header.reset();
                self.board = Board::solved(self.boards.size());
                self.moves = 0;
                self.elapsed_s = 0;
                self.state = State::Initial;
                Step::accepted(self, vec![Effect::CancelTimers])
            }
            _ => Step::ignored(self),
        }
    }

    fn start_event(at: Millis, known_best: Option<f64>) -> PuzzleEvent {
        PuzzleEvent::Start { at, known_best }
    }

    fn timer_event(fired: FiredTimer) -> PuzzleEvent {
        PuzzleEvent::Timer(fired)
    }

    fn teardown_event() -> PuzzleEvent {
        PuzzleEvent::Teardown
    }

    // Moves are not scored responses.
    fn responses(&self) -> Vec<Response> {
        Vec::new()
    }

    fn metrics(&self) -> Option<GameMetrics> {
        if !self.is_finished() {
            return None;
        }
        Some(GameMetrics::SlidingPuzzle(PuzzleMetrics {
            time_taken_s: self.elapsed_s,
            puzzle_size: self.board.size_label(),
            moves_made: self.moves,
        }))
    }
}
