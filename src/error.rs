//! Error types for the rating engine
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate.

use uuid::Uuid;

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating engine scenarios
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("invalid match outcome: {reason}")]
    InvalidOutcome { reason: String },

    #[error("unknown league: {league}")]
    UnknownLeague { league: String },

    #[error("team '{team}' belongs to league '{expected}', not '{declared}'")]
    TeamLeagueMismatch {
        team: String,
        expected: String,
        declared: String,
    },

    #[error("match {match_id} predates already-applied matches in league '{league}'")]
    OutOfOrderMatch { match_id: Uuid, league: String },

    #[error("match {match_id} has already been recorded")]
    DuplicateMatch { match_id: Uuid },

    #[error("configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("internal engine error: {message}")]
    InternalError { message: String },
}
