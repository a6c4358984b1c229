//! Error types for the wire layer.

use thiserror::Error;

/// Errors that can occur talking to the mail service.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport or body decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Push channel transport failure.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Credential rejected; the session is no longer valid.
    #[error("authorization rejected by the mail service")]
    Unauthorized,

    /// Service answered with a non-success status.
    #[error("mail service returned HTTP {status}")]
    Status {
        /// Status code of the response.
        status: u16,
    },
}

impl Error {
    /// Whether this failure means the session credential is no longer
    /// accepted.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
