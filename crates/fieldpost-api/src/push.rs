//! Push channel client.
//!
//! One WebSocket per authenticated user, addressed by user id. The
//! service pushes JSON events; everything else on the wire is
//! heartbeat traffic.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;

use crate::error::Result;
use crate::types::{PushEvent, UserId};

/// Persistent push connection for one user session.
#[derive(Debug)]
pub struct PushSocket {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl PushSocket {
    /// Opens the push channel for `user_id` against `ws_base`.
    ///
    /// `ws_base` is the socket mount (for example `wss://host`); the
    /// per-user path is appended here.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub async fn connect(ws_base: &str, user_id: &UserId) -> Result<Self> {
        let url = format!("{}/ws/mail/{user_id}", ws_base.trim_end_matches('/'));
        debug!(user = %user_id, "opening push channel");
        let (stream, _response) = connect_async(url).await?;
        Ok(Self { stream })
    }

    /// Waits for the next mail event.
    ///
    /// Returns `Ok(None)` once the server closes the channel. Heartbeat
    /// acknowledgments (non-JSON text) and unknown event types are
    /// consumed without surfacing.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream fails.
    pub async fn next_event(&mut self) -> Result<Option<PushEvent>> {
        while let Some(frame) = self.stream.next().await {
            match frame? {
                Message::Text(raw) => match serde_json::from_str(raw.as_str()) {
                    Ok(PushEvent::Unknown) => {
                        debug!(payload = raw.as_str(), "ignoring unknown push event type");
                    }
                    Ok(event) => return Ok(Some(event)),
                    // Non-JSON text is a heartbeat acknowledgment.
                    Err(_) => {}
                },
                Message::Close(_) => return Ok(None),
                // Control and binary frames carry no mail events.
                _ => {}
            }
        }
        Ok(None)
    }

    /// Sends a liveness ping.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be written.
    pub async fn ping(&mut self) -> Result<()> {
        self.stream.send(Message::text("ping")).await?;
        Ok(())
    }

    /// Closes the channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the close handshake fails.
    pub async fn close(&mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}
