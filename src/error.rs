//! Error taxonomy shared by the analytics library.

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// Malformed input: defender track without exactly one goalkeeper,
    /// non-finite coordinates, an event log without exactly two teams, or an
    /// event record missing a required field.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An event or resource the caller expected to exist is absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The injected scaler/model is missing or rejected the input.
    #[error("Scoring unavailable: {0}")]
    ScoringUnavailable(String),

    /// Triangle test asked for strict handling of collinear reference points.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalyticsError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn scoring(msg: impl Into<String>) -> Self {
        Self::ScoringUnavailable(msg.into())
    }
}
