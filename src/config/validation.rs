//! Semantic validation of [`GamesConfig`].
//!
//! Runs after deserialization and collects every issue instead of stopping
//! at the first. Errors reject the configuration; warnings are reported
//! alongside a configuration that still loads.

use reqwest::Url;

use crate::config::schema::GamesConfig;
use crate::error::{Severity, ValidationIssue};

/// Largest supported sliding-puzzle side.
const MAX_PUZZLE_SIZE: usize = 255;

/// Boards above this side are valid but impractical to solve by hand.
const LARGE_PUZZLE_SIZE: usize = 6;

// ============================================================================
// Public API
// ============================================================================

/// Outcome of validating a configuration.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Issues that prevent loading.
    pub errors: Vec<ValidationIssue>,

    /// Informational issues.
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates every section of `config`.
    pub fn validate(&mut self, config: &GamesConfig) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_reaction_time(config);
        self.validate_sequence_recall(config);
        self.validate_digit_span(config);
        self.validate_sliding_puzzle(config);
        self.validate_interference(config);
        self.validate_arithmetic(config);
        self.validate_store(config);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Game sections
    // ========================================================================

    fn validate_reaction_time(&mut self, config: &GamesConfig) {
        let rt = &config.reaction_time;
        if rt.min_delay >= rt.max_delay {
            self.add_error(
                "reaction_time.max_delay",
                &format!(
                    "max_delay ({}) must be greater than min_delay ({})",
                    humantime::format_duration(rt.max_delay),
                    humantime::format_duration(rt.min_delay)
                ),
            );
        }
        if rt.min_delay.is_zero() {
            self.add_warning(
                "reaction_time.min_delay",
                "a zero min_delay lets the go signal appear immediately",
            );
        }
    }

    fn validate_sequence_recall(&mut self, config: &GamesConfig) {
        let sr = &config.sequence_recall;
        if sr.flash_interval.is_zero() {
            self.add_error(
                "sequence_recall.flash_interval",
                "flash_interval must be greater than zero",
            );
        }
    }

    fn validate_digit_span(&mut self, config: &GamesConfig) {
        let ds = &config.digit_span;
        if ds.initial_length == 0 {
            self.add_error("digit_span.initial_length", "initial_length must be at least 1");
        }
        if ds.max_length < ds.initial_length {
            self.add_error(
                "digit_span.max_length",
                &format!(
                    "max_length ({}) must not be below initial_length ({})",
                    ds.max_length, ds.initial_length
                ),
            );
        }
        if ds.length_increment == 0 {
            self.add_error(
                "digit_span.length_increment",
                "length_increment must be at least 1",
            );
        } else if ds.max_length >= ds.initial_length
            && (ds.max_length - ds.initial_length) % ds.length_increment != 0
        {
            self.add_warning(
                "digit_span.length_increment",
                "lengths do not land on max_length; the last round is clamped to it",
            );
        }
        if ds.memorize_per_digit.is_zero() {
            self.add_error(
                "digit_span.memorize_per_digit",
                "memorize_per_digit must be greater than zero",
            );
        }
    }

    fn validate_sliding_puzzle(&mut self, config: &GamesConfig) {
        let size = config.sliding_puzzle.size;
        if !(2..=MAX_PUZZLE_SIZE).contains(&size) {
            self.add_error(
                "sliding_puzzle.size",
                &format!("size must be between 2 and {MAX_PUZZLE_SIZE}, got {size}"),
            );
        } else if size > LARGE_PUZZLE_SIZE {
            self.add_warning(
                "sliding_puzzle.size",
                &format!("a {size}x{size} board is impractical to solve by hand"),
            );
        }
    }

    fn validate_interference(&mut self, config: &GamesConfig) {
        let total = config.interference.total_trials;
        if total == 0 || total % 2 != 0 {
            self.add_error(
                "interference.total_trials",
                &format!(
                    "total_trials must be a positive even number so half can be congruent, got {total}"
                ),
            );
        }
    }

    fn validate_arithmetic(&mut self, config: &GamesConfig) {
        let ar = &config.arithmetic;
        if ar.questions_per_tier == 0 {
            self.add_error(
                "arithmetic.questions_per_tier",
                "questions_per_tier must be at least 1",
            );
        }
        if ar.tiers.is_empty() {
            self.add_error("arithmetic.tiers", "at least one tier is required");
        }
        for (i, tier) in ar.tiers.iter().enumerate() {
            if tier.terms == 0 {
                self.add_error(&format!("arithmetic.tiers[{i}].terms"), "terms must be at least 1");
            }
            if tier.max_value == 0 {
                self.add_error(
                    &format!("arithmetic.tiers[{i}].max_value"),
                    "max_value must be at least 1",
                );
            }
        }
        if ar.tiers.windows(2).any(|w| w[1].level <= w[0].level) {
            self.add_warning(
                "arithmetic.tiers",
                "tier levels are not strictly increasing; reported difficulty will not be monotonic",
            );
        }
    }

    // ========================================================================
    // Store
    // ========================================================================

    fn validate_store(&mut self, config: &GamesConfig) {
        let store = &config.store;
        match Url::parse(&store.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                if url.scheme() == "http" && store.token.is_some() {
                    self.add_warning(
                        "store.token",
                        "bearer token will be sent over plain HTTP",
                    );
                }
            }
            Ok(url) => self.add_error(
                "store.base_url",
                &format!("unsupported scheme '{}', expected http or https", url.scheme()),
            ),
            Err(e) => self.add_error("store.base_url", &format!("invalid URL: {e}")),
        }
        if store.timeout.is_zero() {
            self.add_error("store.timeout", "timeout must be greater than zero");
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}
