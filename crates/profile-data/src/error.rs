//! Error types for the profile-data crate.

use thiserror::Error;

/// Errors raised while turning backend JSON into canonical domain types.
#[derive(Error, Debug)]
pub enum ProfileDataError {
    /// A required field was absent from a record
    #[error("Missing field: {field}")]
    MissingField { field: String },

    /// A field was present but could not be interpreted
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// The payload was not any of the envelope shapes we accept
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ProfileDataError>;
