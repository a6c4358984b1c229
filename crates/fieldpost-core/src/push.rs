//! Push side: the live event channel plus the polling safety net.
//!
//! One channel per signed-in user. A missing or dropped channel is
//! never fatal and never re-dialed; the fallback poll keeps the
//! counters moving until logout.

use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use fieldpost_api::{Folder, PushEvent, PushSocket};

use crate::event::MailEvent;
use crate::mailbox::Mailbox;

/// Connectivity mode of the push side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushMode {
    /// Live channel up; events drive the refreshes.
    Connected,
    /// No channel; a timer polls the counters instead.
    Polling,
}

impl Mailbox {
    /// Starts the push side: arms the fallback poll, then tries to
    /// open the event channel.
    ///
    /// Call once after construction. A failed dial is not an error;
    /// the engine stays in [`PushMode::Polling`]. A channel that later
    /// drops is not re-dialed either: the mode flips back to polling
    /// and the fallback timer carries on.
    pub async fn connect_push(&self) {
        {
            let mut state = self.shared.state.lock();
            if state.shut_down || state.push_started {
                return;
            }
            state.push_started = true;
        }
        self.spawn_fallback_poll();

        let user_id = self.shared.session.user_id().clone();
        match PushSocket::connect(&self.shared.config.ws_url, &user_id).await {
            Ok(mut socket) => {
                if self.shared.state.lock().shut_down {
                    let _ = socket.close().await;
                    return;
                }
                self.set_push_mode(PushMode::Connected);
                self.spawn_channel_task(socket);
            }
            Err(error) => {
                warn!(%error, "push channel unavailable, staying on polling");
            }
        }
    }

    pub(crate) fn set_push_mode(&self, mode: PushMode) {
        let changed = {
            let mut state = self.shared.state.lock();
            let changed = state.push_mode != mode;
            state.push_mode = mode;
            changed
        };
        if changed {
            self.emit(MailEvent::PushModeChanged(mode));
        }
    }

    /// Runs the channel until the server closes it, it fails, or the
    /// mailbox shuts down.
    fn spawn_channel_task(&self, mut socket: PushSocket) {
        let mailbox = self.clone();
        let mut shutdown = self.shared.shutdown.subscribe();
        tokio::spawn(async move {
            let mut heartbeat = time::interval(mailbox.shared.config.heartbeat_interval);
            heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; pings start one
            // interval in.
            heartbeat.tick().await;

            loop {
                tokio::select! {
                    event = socket.next_event() => match event {
                        Ok(Some(event)) => mailbox.handle_push_event(event).await,
                        Ok(None) => {
                            debug!("push channel closed by server");
                            break;
                        }
                        Err(error) => {
                            warn!(%error, "push channel failed");
                            break;
                        }
                    },
                    _ = heartbeat.tick() => {
                        if let Err(error) = socket.ping().await {
                            warn!(%error, "heartbeat ping failed");
                            break;
                        }
                    }
                    _ = shutdown.recv() => {
                        debug!("closing push channel");
                        let _ = socket.close().await;
                        return;
                    }
                }
            }
            mailbox.set_push_mode(PushMode::Polling);
        });
    }

    async fn handle_push_event(&self, event: PushEvent) {
        debug!(?event, "push event");
        match event {
            PushEvent::NewMail | PushEvent::UnreadUpdate => {
                self.refresh_stats().await;
                let viewing_inbox = self.shared.state.lock().nav.viewing(Folder::Inbox);
                if viewing_inbox
                    && let Err(error) = self.load_first_page().await
                {
                    warn!(%error, "push-triggered reload failed");
                }
            }
            // The socket already drops these; nothing to do.
            PushEvent::Unknown => {}
        }
    }

    /// Polls the counters while no channel is up, so unread badges
    /// still advance without the push path.
    fn spawn_fallback_poll(&self) {
        let mailbox = self.clone();
        let mut shutdown = self.shared.shutdown.subscribe();
        tokio::spawn(async move {
            let mut ticker = time::interval(mailbox.shared.config.fallback_poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let polling = {
                            let state = mailbox.shared.state.lock();
                            !state.shut_down && state.push_mode == PushMode::Polling
                        };
                        if polling {
                            mailbox.refresh_stats().await;
                        }
                    }
                    _ = shutdown.recv() => {
                        debug!("stopping fallback poll");
                        return;
                    }
                }
            }
        });
    }
}
