//! Optimistic mutations: the local effect lands first, then the
//! remote call goes out, and a failed call puts the local state back.
//!
//! Every mutation ends with a counter refresh whatever the outcome, so
//! the unread/total badges track the last known server state.

use std::collections::HashSet;

use tracing::{debug, warn};

use fieldpost_api::{BulkDeleteRequest, Folder, MessageDetail, MessageId};

use crate::confirm::ConfirmAction;
use crate::error::{Error, Result};
use crate::event::MailEvent;
use crate::mailbox::Mailbox;

impl Mailbox {
    /// Flips a message's star.
    ///
    /// The flag flips locally before the call goes out. The server's
    /// answer is authoritative (a concurrent client may have toggled
    /// too) and overwrites the local guess; a failed call restores
    /// the previous value.
    ///
    /// Returns the flag's value after reconciliation.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails.
    pub async fn toggle_star(&self, id: MessageId) -> Result<bool> {
        self.guard_active()?;
        let previous = {
            let mut state = self.shared.state.lock();
            let mut previous = None;
            state.store.patch(id, |row| {
                previous.get_or_insert(row.is_starred);
                row.is_starred = !row.is_starred;
            });
            previous
        };
        if previous.is_some() {
            self.emit(MailEvent::ListChanged);
        }

        let outcome = match self.shared.api.toggle_star(id).await {
            Ok(star) => {
                {
                    let mut state = self.shared.state.lock();
                    state.store.patch(id, |row| row.is_starred = star.is_starred);
                }
                self.emit(MailEvent::ListChanged);
                Ok(star.is_starred)
            }
            Err(error) => {
                if let Some(was) = previous {
                    {
                        let mut state = self.shared.state.lock();
                        state.store.patch(id, |row| row.is_starred = was);
                    }
                    self.emit(MailEvent::ListChanged);
                }
                Err(error.into())
            }
        };
        self.refresh_stats().await;
        outcome
    }

    /// Opens a message: marks it read locally, fetches the body, and
    /// selects the detail.
    ///
    /// The service marks inbox entries read as part of serving the
    /// detail; the local patch keeps the list in step without waiting.
    /// A failed fetch puts the flag back and surfaces the error rather
    /// than leaving a silently wrong read state.
    ///
    /// # Errors
    ///
    /// Returns an error if the detail fetch fails.
    pub async fn open_message(&self, id: MessageId) -> Result<MessageDetail> {
        self.guard_active()?;
        let (folder, was_unread) = {
            let mut state = self.shared.state.lock();
            let mut was_unread = false;
            state.store.patch(id, |row| {
                was_unread = was_unread || !row.is_read;
                row.is_read = true;
            });
            (state.nav.folder, was_unread)
        };
        if was_unread {
            self.emit(MailEvent::ListChanged);
        }

        let fetched = match folder {
            Folder::Sent => self.shared.api.sent_message(id).await,
            Folder::Inbox | Folder::Trash => self.shared.api.message(id).await,
        };
        let outcome = match fetched {
            Ok(detail) => {
                {
                    let mut state = self.shared.state.lock();
                    state.store.set_detail(detail.clone());
                }
                self.emit(MailEvent::ListChanged);
                Ok(detail)
            }
            Err(error) => {
                if was_unread {
                    {
                        let mut state = self.shared.state.lock();
                        state.store.patch(id, |row| row.is_read = false);
                    }
                    self.emit(MailEvent::ListChanged);
                }
                Err(error.into())
            }
        };
        self.refresh_stats().await;
        outcome
    }

    /// Deletes one message after confirmation.
    ///
    /// From the trash this is permanent; elsewhere the service moves
    /// the entry to trash. The row leaves the local list before the
    /// call goes out and comes back if the call fails.
    ///
    /// Returns `false` if the confirmation policy declined.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails.
    pub async fn delete_message(&self, id: MessageId) -> Result<bool> {
        self.guard_active()?;
        let folder = self.shared.state.lock().nav.folder;
        let action = if folder == Folder::Trash {
            ConfirmAction::DeleteForever
        } else {
            ConfirmAction::DeleteMessage
        };
        if !self.shared.confirm.confirm(&action) {
            debug!(%id, "delete declined");
            return Ok(false);
        }

        let removed = {
            let mut state = self.shared.state.lock();
            state.store.remove(&HashSet::from([id]))
        };
        if !removed.is_empty() {
            self.emit(MailEvent::ListChanged);
        }

        let called = match folder {
            Folder::Trash => self.shared.api.delete_forever(id).await,
            Folder::Inbox | Folder::Sent => self.shared.api.delete(id).await,
        };
        let outcome = match called {
            Ok(()) => Ok(true),
            Err(error) => {
                warn!(%id, %error, "delete failed, restoring row");
                {
                    let mut state = self.shared.state.lock();
                    state.store.restore_removed(removed);
                }
                self.emit(MailEvent::ListChanged);
                Err(error.into())
            }
        };
        self.refresh_stats().await;
        outcome
    }

    /// Moves a trashed message back to the inbox.
    ///
    /// Only valid while the trash folder is active. The row leaves the
    /// local trash immediately; it shows up in the inbox on the next
    /// inbox load, not synchronously.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInTrash`] outside the trash folder, or the
    /// remote failure after the local removal has been undone.
    pub async fn restore_message(&self, id: MessageId) -> Result<()> {
        self.guard_active()?;
        let removed = {
            let mut state = self.shared.state.lock();
            if state.nav.folder != Folder::Trash {
                return Err(Error::NotInTrash);
            }
            state.store.remove(&HashSet::from([id]))
        };
        if !removed.is_empty() {
            self.emit(MailEvent::ListChanged);
        }

        let outcome = match self.shared.api.restore(id).await {
            Ok(()) => Ok(()),
            Err(error) => {
                warn!(%id, %error, "restore failed, returning row to trash");
                {
                    let mut state = self.shared.state.lock();
                    state.store.restore_removed(removed);
                }
                self.emit(MailEvent::ListChanged);
                Err(error.into())
            }
        };
        self.refresh_stats().await;
        outcome
    }

    /// Deletes every selected message after confirmation.
    ///
    /// On success the rows and the selection are gone; on failure both
    /// come back so the user can retry.
    ///
    /// Returns `false` when nothing is selected or confirmation was
    /// declined.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails.
    pub async fn bulk_delete(&self) -> Result<bool> {
        self.guard_active()?;
        let (ids, folder) = {
            let state = self.shared.state.lock();
            (state.store.selected().clone(), state.nav.folder)
        };
        if ids.is_empty() {
            return Ok(false);
        }
        if !self.shared.confirm.confirm(&ConfirmAction::BulkDelete(ids.len())) {
            debug!(count = ids.len(), "bulk delete declined");
            return Ok(false);
        }

        let removed = {
            let mut state = self.shared.state.lock();
            state.store.remove(&ids)
        };
        self.emit(MailEvent::ListChanged);

        let mut sorted: Vec<MessageId> = ids.iter().copied().collect();
        sorted.sort_unstable();
        let request = BulkDeleteRequest { ids: sorted, folder };
        let outcome = match self.shared.api.bulk_delete(&request).await {
            Ok(()) => Ok(true),
            Err(error) => {
                warn!(count = request.ids.len(), %error, "bulk delete failed, restoring rows");
                {
                    let mut state = self.shared.state.lock();
                    state.store.restore_removed(removed);
                }
                self.emit(MailEvent::ListChanged);
                Err(error.into())
            }
        };
        self.refresh_stats().await;
        outcome
    }
}
