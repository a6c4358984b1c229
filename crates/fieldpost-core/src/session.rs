//! User session handed to the engine at construction.

use fieldpost_api::UserId;

/// Authenticated identity the engine acts for.
///
/// Built by the application's auth layer and injected; the engine
/// never refreshes or persists the credential. When the credential
/// expires, calls fail with an authorization error and the application
/// is expected to tear the mailbox down.
#[derive(Clone)]
pub struct Session {
    user_id: UserId,
    token: String,
}

impl Session {
    /// Creates a session from a user id and its bearer credential.
    #[must_use]
    pub fn new(user_id: UserId, token: impl Into<String>) -> Self {
        Self {
            user_id,
            token: token.into(),
        }
    }

    /// Account the mailbox belongs to.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// The bearer credential.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("token", &"<redacted>")
            .finish()
    }
}
