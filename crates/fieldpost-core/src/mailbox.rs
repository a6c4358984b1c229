//! Mailbox facade: one engine handle per signed-in user.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use fieldpost_api::{
    Draft, FolderStats, MailApi, MessageDetail, MessageId, MessageSummary,
};

use crate::compose::ComposePrefill;
use crate::config::MailboxConfig;
use crate::confirm::{AutoConfirm, ConfirmPolicy};
use crate::error::{Error, Result};
use crate::event::MailEvent;
use crate::navigator::FolderNavigator;
use crate::push::PushMode;
use crate::session::Session;
use crate::store::MessageStore;

/// Mutable engine state, touched only behind the lock and never across
/// an await.
pub(crate) struct MailState {
    pub(crate) nav: FolderNavigator,
    pub(crate) search: String,
    pub(crate) store: MessageStore,
    pub(crate) stats: FolderStats,
    pub(crate) drafts: Vec<Draft>,
    pub(crate) prefill: Option<ComposePrefill>,
    pub(crate) pulls_in_flight: usize,
    pub(crate) search_epoch: u64,
    pub(crate) push_mode: PushMode,
    pub(crate) push_started: bool,
    pub(crate) shut_down: bool,
}

pub(crate) struct Shared {
    pub(crate) api: MailApi,
    pub(crate) session: Session,
    pub(crate) config: MailboxConfig,
    pub(crate) state: Mutex<MailState>,
    pub(crate) events: broadcast::Sender<MailEvent>,
    pub(crate) confirm: Box<dyn ConfirmPolicy>,
    pub(crate) shutdown: broadcast::Sender<()>,
}

/// Per-user mail engine: folder listings, the push channel, optimistic
/// mutations, and the compose bridge behind one cheap-to-clone handle.
///
/// Construct with an injected [`Session`], call
/// [`connect_push`](Mailbox::connect_push) once, and call
/// [`shutdown`](Mailbox::shutdown) on logout. Shutdown closes the push
/// channel and stops the timers, so nothing keeps fetching for a
/// credential that is no longer valid.
#[derive(Clone)]
pub struct Mailbox {
    pub(crate) shared: Arc<Shared>,
}

impl Mailbox {
    /// Creates an engine for `session` against the configured service.
    #[must_use]
    pub fn new(session: Session, config: MailboxConfig) -> Self {
        Self::with_confirm(session, config, AutoConfirm)
    }

    /// Creates an engine with a custom confirmation policy for
    /// destructive actions.
    #[must_use]
    pub fn with_confirm(
        session: Session,
        config: MailboxConfig,
        confirm: impl ConfirmPolicy + 'static,
    ) -> Self {
        let api = MailApi::new(config.base_url.clone(), session.token());
        let (events, _) = broadcast::channel(64);
        let (shutdown, _) = broadcast::channel(1);
        let state = MailState {
            nav: FolderNavigator::default(),
            search: String::new(),
            store: MessageStore::new(config.page_size),
            stats: FolderStats::default(),
            drafts: Vec::new(),
            prefill: None,
            pulls_in_flight: 0,
            search_epoch: 0,
            push_mode: PushMode::Polling,
            push_started: false,
            shut_down: false,
        };
        Self {
            shared: Arc::new(Shared {
                api,
                session,
                config,
                state: Mutex::new(state),
                events,
                confirm: Box::new(confirm),
                shutdown,
            }),
        }
    }

    /// The session this engine acts for.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.shared.session
    }

    /// Snapshot of the loaded listing, most recent first.
    #[must_use]
    pub fn messages(&self) -> Vec<MessageSummary> {
        self.shared.state.lock().store.messages().to_vec()
    }

    /// Whether the server may have rows beyond the loaded window.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.shared.state.lock().store.has_more()
    }

    /// Offset the next page fetch starts at.
    #[must_use]
    pub fn skip(&self) -> usize {
        self.shared.state.lock().store.skip()
    }

    /// The opened message, if one is selected.
    #[must_use]
    pub fn selected_detail(&self) -> Option<MessageDetail> {
        self.shared.state.lock().store.detail().cloned()
    }

    /// Closes the opened message.
    pub fn close_detail(&self) {
        self.shared.state.lock().store.clear_detail();
        self.emit(MailEvent::ListChanged);
    }

    /// Last known counter snapshot.
    #[must_use]
    pub fn stats(&self) -> FolderStats {
        self.shared.state.lock().stats
    }

    /// Snapshot of the loaded draft list.
    #[must_use]
    pub fn drafts(&self) -> Vec<Draft> {
        self.shared.state.lock().drafts.clone()
    }

    /// Current tab and folder selection.
    #[must_use]
    pub fn navigator(&self) -> FolderNavigator {
        self.shared.state.lock().nav
    }

    /// Current search term (applies to the inbox listing only).
    #[must_use]
    pub fn search(&self) -> String {
        self.shared.state.lock().search.clone()
    }

    /// Ids ticked for a bulk operation.
    #[must_use]
    pub fn selection(&self) -> HashSet<MessageId> {
        self.shared.state.lock().store.selected().clone()
    }

    /// Ticks or unticks a row for bulk operations.
    pub fn toggle_select(&self, id: MessageId) {
        self.shared.state.lock().store.toggle_selected(id);
        self.emit(MailEvent::ListChanged);
    }

    /// Clears the bulk selection.
    pub fn clear_selection(&self) {
        self.shared.state.lock().store.clear_selection();
        self.emit(MailEvent::ListChanged);
    }

    /// Whether a listing fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.shared.state.lock().pulls_in_flight > 0
    }

    /// Current push connectivity mode.
    #[must_use]
    pub fn push_mode(&self) -> PushMode {
        self.shared.state.lock().push_mode
    }

    /// Subscribes to change notices.
    ///
    /// A lagging subscriber misses old notices, never state: read the
    /// mailbox again on the next notice.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<MailEvent> {
        self.shared.events.subscribe()
    }

    /// Re-reads the counter snapshot from the service.
    ///
    /// Failures are logged and swallowed; the counters keep their last
    /// known values until some later refresh lands.
    pub async fn refresh_stats(&self) {
        if self.guard_active().is_err() {
            return;
        }
        match self.shared.api.stats().await {
            Ok(stats) => self.apply_stats(stats),
            Err(error) => warn!(%error, "stats refresh failed"),
        }
    }

    /// Reads the bare inbox unread count without touching engine state.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the mailbox is shut down.
    pub async fn unread_count(&self) -> Result<u32> {
        self.guard_active()?;
        Ok(self.shared.api.unread_count().await?)
    }

    /// Tears the engine down on logout.
    ///
    /// Marks the mailbox stopped, signals the push channel to close,
    /// and stops the heartbeat and fallback timers. Safe to call more
    /// than once; later calls on the engine answer
    /// [`Error::ShutDown`].
    pub fn shutdown(&self) {
        {
            let mut state = self.shared.state.lock();
            if state.shut_down {
                return;
            }
            state.shut_down = true;
        }
        let _ = self.shared.shutdown.send(());
        debug!(user = %self.shared.session.user_id(), "mailbox shut down");
    }

    pub(crate) fn guard_active(&self) -> Result<()> {
        if self.shared.state.lock().shut_down {
            return Err(Error::ShutDown);
        }
        Ok(())
    }

    pub(crate) fn emit(&self, event: MailEvent) {
        let _ = self.shared.events.send(event);
    }

    pub(crate) fn apply_stats(&self, stats: FolderStats) {
        {
            let mut state = self.shared.state.lock();
            if state.shut_down {
                return;
            }
            state.stats = stats;
        }
        self.emit(MailEvent::StatsChanged(stats));
    }
}

impl std::fmt::Debug for Mailbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailbox")
            .field("user_id", self.shared.session.user_id())
            .field("push_mode", &self.push_mode())
            .finish_non_exhaustive()
    }
}
