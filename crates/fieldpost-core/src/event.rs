//! Change notifications for embedding frontends.

use fieldpost_api::FolderStats;

use crate::push::PushMode;

/// State change notice broadcast by the engine.
///
/// Notices are re-render hints: subscribers read the mailbox state
/// they care about when one arrives. Lagging subscribers lose old
/// notices, never state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailEvent {
    /// The loaded listing changed (replace, append, patch, or remove).
    ListChanged,
    /// The counter snapshot was refreshed.
    StatsChanged(FolderStats),
    /// The draft list changed.
    DraftsChanged,
    /// The navigator or compose bridge moved.
    ViewChanged,
    /// The push side switched between channel and polling.
    PushModeChanged(PushMode),
}
