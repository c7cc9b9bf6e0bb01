//! Error types for stemma operations

use thiserror::Error;

/// Event delivery errors from the sink boundary.
///
/// The core never interprets these; they propagate to the caller of the
/// lifecycle callback that triggered the emission.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SinkError {
    #[error("Delivery to {target} failed: {reason}")]
    Delivery { target: String, reason: String },

    #[error("Sink rejected event with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Event serialization failed: {reason}")]
    Serialization { reason: String },
}

/// Configuration errors, fatal at install time before any event is built.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Lineage extraction errors.
///
/// Always recovered locally by the walker: a failing column is skipped, a
/// failing facility yields "no lineage." Never user-visible.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LineageError {
    #[error("No dependency graph available for column {column}")]
    GraphUnavailable { column: String },

    #[error("Traversal failed for column {column}: {reason}")]
    TraversalFailed { column: String, reason: String },
}

/// Master error type for all stemma errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StemmaError {
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Lineage error: {0}")]
    Lineage(#[from] LineageError),
}

/// Result type alias for stemma operations.
pub type StemmaResult<T> = Result<T, StemmaError>;

// =============================================================================
// TESTS
// =============================================================================
