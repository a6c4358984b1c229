//! Paginated pull: first page, load-more, and the debounced search.

use tracing::{debug, warn};

use fieldpost_api::Folder;

use crate::error::Result;
use crate::event::MailEvent;
use crate::mailbox::{MailState, Mailbox};
use crate::navigator::ActiveTab;

/// Key a listing request is tagged with at dispatch.
///
/// A response only lands if the navigator still produces the same key
/// when it arrives; anything else is stale and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FetchKey {
    folder: Folder,
    search: String,
}

impl FetchKey {
    /// The key the navigator would stamp on a request right now.
    ///
    /// Search only travels on inbox requests, so for other folders the
    /// key carries an empty term no matter what the user typed.
    fn current(state: &MailState) -> Self {
        let folder = state.nav.folder;
        let search = if folder == Folder::Inbox {
            state.search.clone()
        } else {
            String::new()
        };
        Self { folder, search }
    }

    fn search_param(&self) -> Option<&str> {
        (!self.search.is_empty()).then_some(self.search.as_str())
    }
}

impl Mailbox {
    /// Resets the active folder to a fresh page 1, refreshing the
    /// counters alongside.
    ///
    /// Responses that arrive after the navigator moved on are dropped,
    /// so a slow fetch for a previous folder can never overwrite a
    /// newer one. Concurrent calls for the same key are idempotent;
    /// whichever lands last wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails; the list keeps
    /// its last good state. Counter failures are swallowed.
    pub async fn load_first_page(&self) -> Result<()> {
        self.guard_active()?;
        let key = {
            let mut state = self.shared.state.lock();
            state.pulls_in_flight += 1;
            FetchKey::current(&state)
        };
        debug!(folder = %key.folder, search = %key.search, "loading first page");

        let page_size = self.shared.config.page_size;
        let (page, stats) = tokio::join!(
            self.shared
                .api
                .list(key.folder, 0, page_size, key.search_param()),
            self.shared.api.stats(),
        );

        // Counters are folder-independent; land them even when the
        // page turns out stale.
        match stats {
            Ok(stats) => self.apply_stats(stats),
            Err(error) => warn!(%error, "stats refresh failed"),
        }

        let mut state = self.shared.state.lock();
        state.pulls_in_flight = state.pulls_in_flight.saturating_sub(1);
        if state.shut_down {
            return Ok(());
        }
        if FetchKey::current(&state) != key {
            debug!(folder = %key.folder, "dropping stale first-page response");
            return Ok(());
        }
        match page {
            Ok(rows) => {
                state.store.replace(rows);
                drop(state);
                self.emit(MailEvent::ListChanged);
                Ok(())
            }
            Err(error) => {
                drop(state);
                warn!(%error, "first page load failed");
                Err(error.into())
            }
        }
    }

    /// Appends the next page, if the server has more and nothing else
    /// is in flight.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    pub async fn load_next_page(&self) -> Result<()> {
        self.guard_active()?;
        let (key, skip) = {
            let mut state = self.shared.state.lock();
            if !state.store.has_more() || state.pulls_in_flight > 0 {
                return Ok(());
            }
            state.pulls_in_flight += 1;
            (FetchKey::current(&state), state.store.skip())
        };
        debug!(folder = %key.folder, skip, "loading next page");

        let page = self
            .shared
            .api
            .list(key.folder, skip, self.shared.config.page_size, key.search_param())
            .await;

        let mut state = self.shared.state.lock();
        state.pulls_in_flight = state.pulls_in_flight.saturating_sub(1);
        if state.shut_down {
            return Ok(());
        }
        // A replace may have landed underneath; appending onto a fresh
        // page 1 would duplicate rows.
        if FetchKey::current(&state) != key || state.store.skip() != skip {
            debug!(folder = %key.folder, "dropping stale load-more response");
            return Ok(());
        }
        match page {
            Ok(rows) => {
                state.store.append(rows);
                drop(state);
                self.emit(MailEvent::ListChanged);
                Ok(())
            }
            Err(error) => {
                drop(state);
                warn!(%error, "next page load failed");
                Err(error.into())
            }
        }
    }

    /// Updates the search term.
    ///
    /// The matching inbox fetch fires after the configured quiet
    /// period, and only if no newer edit superseded this one. Folders
    /// other than the inbox keep the term but never transmit it.
    pub fn set_search(&self, term: impl Into<String>) {
        let term = term.into();
        let scheduled = {
            let mut state = self.shared.state.lock();
            if state.shut_down {
                return;
            }
            state.search = term;
            state.search_epoch += 1;
            state.nav.viewing(Folder::Inbox).then_some(state.search_epoch)
        };
        let Some(epoch) = scheduled else {
            return;
        };

        let mailbox = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(mailbox.shared.config.search_debounce).await;
            let still_current = {
                let state = mailbox.shared.state.lock();
                !state.shut_down && state.search_epoch == epoch
            };
            if still_current
                && let Err(error) = mailbox.load_first_page().await
            {
                warn!(%error, "search fetch failed");
            }
        });
    }

    /// Switches the active folder and reloads immediately.
    ///
    /// Also brings the listing tab back up, since a folder is only
    /// ever shown there.
    ///
    /// # Errors
    ///
    /// Returns an error if the reload fails.
    pub async fn select_folder(&self, folder: Folder) -> Result<()> {
        self.guard_active()?;
        {
            let mut state = self.shared.state.lock();
            state.nav.tab = ActiveTab::Inbox;
            state.nav.folder = folder;
        }
        self.emit(MailEvent::ViewChanged);
        self.load_first_page().await
    }

    /// Switches the top-level tab.
    ///
    /// Entering the listing tab reloads the active folder; entering
    /// drafts fetches the draft list once; entering compose fetches
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry fetch fails.
    pub async fn select_tab(&self, tab: ActiveTab) -> Result<()> {
        self.guard_active()?;
        {
            let mut state = self.shared.state.lock();
            state.nav.tab = tab;
        }
        self.emit(MailEvent::ViewChanged);
        match tab {
            ActiveTab::Inbox => self.load_first_page().await,
            ActiveTab::Drafts => self.load_drafts().await,
            ActiveTab::Compose => Ok(()),
        }
    }
}
