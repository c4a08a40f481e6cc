//! Error types for the matching crate.

use thiserror::Error;

/// Result type alias for matching operations.
pub type Result<T> = std::result::Result<T, MatchError>;

/// Errors that can occur during matching operations.
///
/// Malformed text never produces an error; it just yields fewer tokens.
/// Only structurally invalid arguments are reported here.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Profile name not present in the supplied reference lists
    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    /// Diet plan document did not contain an ingredient list
    #[error("No ingredient list found in document")]
    NoIngredients,

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error code for integration with mydna-core error handling.
/// Range: 11xxx for matching errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchErrorCode {
    /// Unknown profile name
    UnknownProfile = 11001,
    /// No ingredient list in document
    NoIngredients = 11002,
    /// JSON parsing error
    JsonParsing = 11003,
}

impl MatchError {
    /// Returns the error code for this error.
    pub fn code(&self) -> MatchErrorCode {
        match self {
            MatchError::UnknownProfile(_) => MatchErrorCode::UnknownProfile,
            MatchError::NoIngredients => MatchErrorCode::NoIngredients,
            MatchError::Json(_) => MatchErrorCode::JsonParsing,
        }
    }
}
