//! Error types for `soulcare-games`
//!
//! Domain errors for configuration, content generation, session handling
//! and the external result store, aggregated into [`GamesError`] with a
//! matching CLI exit code.

use std::path::PathBuf;
use thiserror::Error;

use crate::game::GameId;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `soulcare-games` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Result store error (submit or fetch failed)
    pub const STORE_ERROR: i32 = 4;

    /// Session error (result requested before the session finished)
    pub const SESSION_ERROR: i32 = 5;

    /// Generator error (invalid generator parameters)
    pub const GENERATOR_ERROR: i32 = 10;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `soulcare-games` operations.
#[derive(Debug, Error)]
pub enum GamesError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Content generator error
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    /// Session lifecycle error
    #[error(transparent)]
    Session(#[from] SessionError),

    /// External result store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Self-report questionnaire error
    #[error(transparent)]
    SelfReport(#[from] SelfReportError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl GamesError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Generator(_) => ExitCode::GENERATOR_ERROR,
            Self::Session(_) => ExitCode::SESSION_ERROR,
            Self::Store(_) => ExitCode::STORE_ERROR,
            Self::SelfReport(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Json(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Configuration validation failed
    #[error("validation failed for {path}: {}", summarize_issues(.errors))]
    ValidationError {
        /// Path to the configuration file
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// Environment variable referenced in configuration is not set
    #[error("environment variable '{var}' not set ({message})")]
    EnvVarNotSet {
        /// Name of the environment variable
        var: String,
        /// Message supplied with the `${VAR:?message}` reference
        message: String,
    },
}

fn summarize_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found during configuration validation.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Dotted path to the problematic field (e.g., "digit_span.max_length")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Prevents the configuration from being used
    Error,
    /// Reported, but the configuration still loads
    Warning,
}

// ============================================================================
// Generator Errors
// ============================================================================

/// Content generator errors.
///
/// Generation itself is total; these only arise when a generator is
/// constructed with parameters under which no valid stimulus exists.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Invalid generator parameters
    #[error("invalid generator parameters: {0}")]
    InvalidParameters(String),
}

// ============================================================================
// Session Errors
// ============================================================================

/// Session lifecycle errors raised by the runtime driver.
///
/// Responses in non-accepting states are not errors; they are ignored.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A result was requested before the session reached a terminal state
    #[error("{game} session has not finished (current phase: {phase})")]
    NotFinished {
        /// Game being played
        game: GameId,
        /// Phase the session is currently in
        phase: &'static str,
    },

    /// The session's result was already accepted by the store
    #[error("{game} session result was already submitted")]
    AlreadySubmitted {
        /// Game being played
        game: GameId,
    },
}

// ============================================================================
// Store Errors
// ============================================================================

/// Errors from the external result store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request could not be sent or the connection failed
    #[error("request to result store failed: {0}")]
    Request(String),

    /// The store answered with a non-success status
    #[error("result store returned HTTP {status} for {endpoint}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Endpoint that was called
        endpoint: String,
    },

    /// The response body could not be decoded
    #[error("malformed response from result store: {0}")]
    Decode(String),

    /// The store rejected the operation
    #[error("result store unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                endpoint: err.url().map_or_else(String::new, ToString::to_string),
            }
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

// ============================================================================
// Self-report Errors
// ============================================================================

/// Out-of-range self-report questionnaire values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelfReportError {
    /// A rating fell outside its allowed scale
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Questionnaire field name
        field: &'static str,
        /// Rejected value
        value: u8,
        /// Lowest allowed value
        min: u8,
        /// Highest allowed value
        max: u8,
    },
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `soulcare-games` operations.
pub type Result<T> = std::result::Result<T, GamesError>;

// ============================================================================
// Tests
// ============================================================================
