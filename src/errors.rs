//! Error taxonomy for the poll cycle.
//!
//! Every variant here is a single-cycle failure. None of them stops the
//! poll loop; missing configuration is handled before the loop starts.

use thiserror::Error;

/// Failure of the homework API request.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("homework API request failed: {0}")]
    Transport(String),

    #[error("homework API returned HTTP {code} {reason}")]
    HttpStatus { code: u16, reason: String },

    #[error("homework API response is not valid JSON: {0}")]
    Decode(String),
}

/// Malformed response envelope.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructuralError {
    #[error("API response is not a JSON object")]
    NotAMapping,

    #[error("API response has no homeworks")]
    MissingWorkItems,

    #[error("API response homeworks is not a list")]
    NotASequence,
}

/// Missing or unknown fields in the newest homework entry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("homework entry has no homework_name")]
    MissingName,

    #[error("homework entry has no status")]
    MissingStatus,

    #[error("unknown homework status: {0}")]
    UnrecognizedStatus(String),
}

/// Failure to deliver a message to the chat.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("telegram request failed: {0}")]
    Transport(String),

    #[error("telegram returned HTTP {code} {reason}")]
    HttpStatus { code: u16, reason: String },

    #[error("telegram rejected the message: {0}")]
    Rejected(String),
}

/// A poll cycle that could not run to completion.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Field(#[from] FieldError),
}

impl CycleError {
    /// Transport failures are logged at critical severity.
    pub fn is_critical(&self) -> bool {
        matches!(self, CycleError::Fetch(FetchError::Transport(_)))
    }
}
