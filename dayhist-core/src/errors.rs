//! errors.rs - Custom error types for the dayhist-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `dayhist-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DayhistError {
    #[error("Invalid sensor configuration: {0}")]
    InvalidConfig(String),

    #[error("Source entity '{entity_id}' failed validation: {reason}")]
    InvalidSource { entity_id: String, reason: String },

    #[error("Source entity '{0}' is already configured")]
    DuplicateSource(String),

    #[error("Source entity '{0}' is no longer present in the statistics store")]
    SourceNotFound(String),

    #[error("Failed to parse statistics data: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Statistics reader task did not complete: {0}")]
    ReaderTask(#[from] tokio::task::JoinError),
}

impl DayhistError {
    /// Whether this failure should stop further refreshes of a sensor.
    ///
    /// Only a vanished source is permanent; I/O and parse failures are
    /// retried on the next trigger.
    pub fn is_permanent(&self) -> bool {
        matches!(self, DayhistError::SourceNotFound(_))
    }
}
