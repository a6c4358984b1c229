//! Error types for the sync engine.

use thiserror::Error;

/// Errors that can occur in engine operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Wire-level failure talking to the mail service.
    #[error("mail service error: {0}")]
    Api(#[from] fieldpost_api::Error),

    /// Restore requested while a folder other than trash is active.
    #[error("only trashed messages can be restored")]
    NotInTrash,

    /// Outgoing message is missing a subject or a body.
    #[error("message needs a subject and a body")]
    EmptyMessage,

    /// Outgoing message has nobody to go to.
    #[error("message has no recipients")]
    NoRecipient,

    /// The mailbox was shut down; no further calls are serviced.
    #[error("mailbox is shut down")]
    ShutDown,
}

impl Error {
    /// Whether the failure means the session credential was rejected.
    ///
    /// Frontends surface this case at the point of use (for example
    /// blocking a send) instead of treating it as a transient fault.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(fieldpost_api::Error::Unauthorized))
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
