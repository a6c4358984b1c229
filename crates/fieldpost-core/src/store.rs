//! In-memory cache of the active folder's loaded listing.
//!
//! Pure state: every method is synchronous and free of I/O. The pull,
//! push, and mutation paths decide when to call what; the store only
//! keeps their shared view consistent.

use std::collections::HashSet;

use fieldpost_api::{MessageDetail, MessageId, MessageSummary};

/// Rows removed optimistically, with enough context to put them back.
///
/// Produced by [`MessageStore::remove`] and consumed by
/// [`MessageStore::restore_removed`] when the remote call behind the
/// removal fails.
#[derive(Debug, Default)]
pub struct RemovedRows {
    rows: Vec<(usize, MessageSummary)>,
    cleared_detail: Option<MessageDetail>,
    unselected: Vec<MessageId>,
}

impl RemovedRows {
    /// Ids that were present and removed.
    pub fn ids(&self) -> impl Iterator<Item = MessageId> + '_ {
        self.rows.iter().map(|(_, row)| row.id)
    }

    /// Whether the removal touched nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cleared_detail.is_none()
    }
}

/// Authoritative local cache of one folder's loaded window.
#[derive(Debug)]
pub struct MessageStore {
    page_size: usize,
    messages: Vec<MessageSummary>,
    skip: usize,
    has_more: bool,
    detail: Option<MessageDetail>,
    selected: HashSet<MessageId>,
}

impl MessageStore {
    /// Creates an empty store paging by `page_size` rows.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            messages: Vec::new(),
            skip: 0,
            has_more: false,
            detail: None,
            selected: HashSet::new(),
        }
    }

    /// The loaded rows, most recent first.
    #[must_use]
    pub fn messages(&self) -> &[MessageSummary] {
        &self.messages
    }

    /// Offset the next page fetch starts at.
    #[must_use]
    pub const fn skip(&self) -> usize {
        self.skip
    }

    /// Whether the server may have rows beyond the loaded window.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// The opened message, if one is selected.
    #[must_use]
    pub const fn detail(&self) -> Option<&MessageDetail> {
        self.detail.as_ref()
    }

    /// Selects an opened message.
    ///
    /// The detail may reference a row outside the loaded window (for
    /// example after the window was replaced underneath it); the store
    /// carries it regardless.
    pub fn set_detail(&mut self, detail: MessageDetail) {
        self.detail = Some(detail);
    }

    /// Clears the opened message.
    pub fn clear_detail(&mut self) {
        self.detail = None;
    }

    /// Ids ticked for a bulk operation.
    #[must_use]
    pub const fn selected(&self) -> &HashSet<MessageId> {
        &self.selected
    }

    /// Ticks or unticks a row for bulk operations.
    pub fn toggle_selected(&mut self, id: MessageId) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Clears the bulk selection.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Installs a fresh page 1, discarding the previous window.
    ///
    /// The cursor moves to one page in and `has_more` reflects whether
    /// the page came back full. The bulk selection is dropped with the
    /// old window; the opened detail survives a replace.
    pub fn replace(&mut self, rows: Vec<MessageSummary>) {
        self.has_more = rows.len() == self.page_size;
        self.messages = rows;
        self.skip = self.page_size;
        self.selected.clear();
    }

    /// Appends a follow-up page, advancing the cursor.
    pub fn append(&mut self, rows: Vec<MessageSummary>) {
        self.has_more = rows.len() == self.page_size;
        self.messages.extend(rows);
        self.skip += self.page_size;
    }

    /// Applies `apply` to the row with `id`, and to the opened detail
    /// when it is the same message.
    ///
    /// Returns whether a row was found.
    pub fn patch(&mut self, id: MessageId, mut apply: impl FnMut(&mut MessageSummary)) -> bool {
        let mut found = false;
        if let Some(row) = self.messages.iter_mut().find(|row| row.id == id) {
            apply(row);
            found = true;
        }
        if let Some(detail) = self.detail.as_mut()
            && detail.summary.id == id
        {
            apply(&mut detail.summary);
            found = true;
        }
        found
    }

    /// Drops every row whose id is in `ids`, remembering positions so
    /// the removal can be undone.
    ///
    /// Removed rows leave the bulk selection too, and if the opened
    /// detail is one of them it is cleared; both come back alongside
    /// the rows on undo.
    pub fn remove(&mut self, ids: &HashSet<MessageId>) -> RemovedRows {
        let mut removed = RemovedRows::default();
        let mut kept = Vec::with_capacity(self.messages.len());
        for (index, row) in self.messages.drain(..).enumerate() {
            if ids.contains(&row.id) {
                if self.selected.remove(&row.id) {
                    removed.unselected.push(row.id);
                }
                removed.rows.push((index, row));
            } else {
                kept.push(row);
            }
        }
        self.messages = kept;
        if let Some(detail) = self.detail.as_ref()
            && ids.contains(&detail.summary.id)
        {
            removed.cleared_detail = self.detail.take();
        }
        removed
    }

    /// Puts rows removed by [`MessageStore::remove`] back where they
    /// were.
    ///
    /// The window may have been replaced while the remote call was in
    /// flight; rows whose id is already present are skipped and
    /// positions are clamped to the current length.
    pub fn restore_removed(&mut self, removed: RemovedRows) {
        for (index, row) in removed.rows {
            if self.messages.iter().any(|existing| existing.id == row.id) {
                continue;
            }
            let index = index.min(self.messages.len());
            self.messages.insert(index, row);
        }
        self.selected.extend(removed.unselected);
        if self.detail.is_none() {
            self.detail = removed.cleared_detail;
        }
    }
}
