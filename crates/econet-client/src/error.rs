//! Error types for ecoNET client operations

use thiserror::Error;

/// Result type alias for ecoNET client operations
pub type Result<T> = std::result::Result<T, EconetError>;

/// Errors that can occur during ecoNET client operations
#[derive(Error, Debug)]
pub enum EconetError {
    /// Liveness probe against the controller root failed during construction
    #[error("Device probe failed: {0}")]
    ProbeFailed(#[source] Box<EconetError>),

    /// Request could not be sent or the response body could not be read
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Response body was not the expected JSON shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The controller answered a write with a result other than "OK"
    #[error("Unable to set new param: {result}")]
    Rejected { result: String },

    /// Credentials were refused
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Controller returned a non-success HTTP status
    #[error("Device returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
}

impl EconetError {
    /// Create a status error from status code and message
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Create a rejection from the controller's result marker
    pub fn rejected(result: impl Into<String>) -> Self {
        Self::Rejected {
            result: result.into(),
        }
    }

    /// Whether the device answered but declined the write
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Whether the response body failed to decode
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}
