//! Confirmation gate for destructive actions.

/// A destructive action awaiting user confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Move one message to the trash.
    DeleteMessage,
    /// Permanently delete one trashed message.
    DeleteForever,
    /// Delete this many selected messages at once.
    BulkDelete(usize),
}

/// Decides whether a destructive action proceeds.
///
/// Frontends bridge this to their dialog surface. A declined action is
/// reported to the caller as a clean no-op, not an error.
pub trait ConfirmPolicy: Send + Sync {
    /// Returns `true` if the action should proceed.
    fn confirm(&self, action: &ConfirmAction) -> bool;
}

/// Policy that approves every action; the default for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl ConfirmPolicy for AutoConfirm {
    fn confirm(&self, _action: &ConfirmAction) -> bool {
        true
    }
}
