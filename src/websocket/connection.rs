//! WebSocket connection lifecycle management.
//!
//! [`ConnectionManager`] handles connecting, authenticating, replaying
//! subscriptions, reading messages, and automatic reconnection with
//! exponential backoff. It is the single reader of the inbound stream:
//! every state-store mutation happens on its task, in arrival order.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::{Mutex, watch};
use tracing::{error, info, warn};
use tungstenite::Message as WsMessage;

use super::{WsReader, WsWriter, connect, handler, subscription};
use crate::codec;
use crate::state::StateStore;
use crate::websocket::SubscriptionSet;

/// Initial backoff duration between reconnection attempts.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Maximum backoff duration between reconnection attempts.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Why the reader loop exited.
enum DisconnectReason {
    /// The connection was lost or errored.
    ConnectionLost,
    /// The session was intentionally stopped.
    Shutdown,
}

/// Manages the WebSocket connection lifecycle including reconnection
/// with exponential backoff and post-reconnect subscription replay.
pub struct ConnectionManager {
    url: String,
    ssid: String,
    /// Bounded delay between the session token and the replay; the
    /// protocol has no readiness acknowledgment to wait on instead.
    settle: Duration,
    state: Arc<StateStore>,
    writer: Arc<Mutex<Option<WsWriter>>>,
    subscriptions: Arc<Mutex<SubscriptionSet>>,
    shutdown: watch::Receiver<bool>,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    #[must_use]
    pub fn new(
        url: String,
        ssid: String,
        settle: Duration,
        state: Arc<StateStore>,
        writer: Arc<Mutex<Option<WsWriter>>>,
        subscriptions: Arc<Mutex<SubscriptionSet>>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            url,
            ssid,
            settle,
            state,
            writer,
            subscriptions,
            shutdown,
        }
    }

    /// Runs the connection manager until shutdown.
    ///
    /// Connects, authenticates, replays subscriptions, then reads until
    /// disconnection and starts over with exponential backoff.
    pub async fn run(mut self) {
        let mut backoff = INITIAL_BACKOFF;

        loop {
            if *self.shutdown.borrow() {
                return;
            }

            info!(url = %self.url, "connecting to WebSocket");
            let (mut write, read) = match connect(&self.url).await {
                Ok(pair) => pair,
                Err(e) => {
                    error!("connection failed: {e}");
                    if self.backoff_or_shutdown(&mut backoff).await {
                        return;
                    }
                    continue;
                }
            };

            // Authenticate, settle, then re-establish every subscription
            if let Err(e) = subscription::authenticate(&mut write, &self.ssid).await {
                warn!("session token send failed: {e}");
                if self.backoff_or_shutdown(&mut backoff).await {
                    return;
                }
                continue;
            }
            if self.sleep_or_shutdown(self.settle).await {
                return;
            }
            {
                let subscriptions = self.subscriptions.lock().await;
                if let Err(e) = subscription::replay(&mut write, &subscriptions).await {
                    warn!("subscription replay failed: {e}");
                    drop(subscriptions);
                    if self.backoff_or_shutdown(&mut backoff).await {
                        return;
                    }
                    continue;
                }
            }

            // Hand the writer to the session facade
            {
                let mut guard = self.writer.lock().await;
                *guard = Some(write);
            }
            info!("WebSocket connected and subscribed");

            // Reset backoff on successful connection
            backoff = INITIAL_BACKOFF;

            let reason = self.read_loop(read).await;

            // Clear the writer so the facade doesn't use a stale one
            {
                let mut guard = self.writer.lock().await;
                *guard = None;
            }

            match reason {
                DisconnectReason::ConnectionLost => {
                    info!(
                        backoff_secs = backoff.as_secs(),
                        "connection lost, backing off"
                    );
                    if self.backoff_or_shutdown(&mut backoff).await {
                        return;
                    }
                }
                DisconnectReason::Shutdown => {
                    info!("connection manager shutting down");
                    return;
                }
            }
        }
    }

    /// Reads and applies messages until disconnection or shutdown.
    ///
    /// A malformed frame or a failing handler drops that one message and
    /// keeps the loop alive; only transport errors end it.
    async fn read_loop(&mut self, mut read: WsReader) -> DisconnectReason {
        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(WsMessage::Text(text))) => match codec::decode(&text) {
                            Ok(envelope) => {
                                let name = envelope.name.clone();
                                if let Err(e) = handler::dispatch(&self.state, envelope) {
                                    warn!(name = %name, error = %e, "message handler failed");
                                }
                            }
                            Err(e) => warn!(error = %e, "dropping malformed frame"),
                        },
                        Some(Ok(_)) => {} // Binary/Ping/Pong/Close frames
                        Some(Err(e)) => {
                            warn!("WebSocket error: {e}");
                            return DisconnectReason::ConnectionLost;
                        }
                        None => {
                            warn!("WebSocket stream ended");
                            return DisconnectReason::ConnectionLost;
                        }
                    }
                }

                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        return DisconnectReason::Shutdown;
                    }
                }
            }
        }
    }

    /// Sleeps for the current backoff, doubling it up to the cap.
    /// Returns `true` if shutdown was signalled while waiting.
    async fn backoff_or_shutdown(&mut self, backoff: &mut Duration) -> bool {
        info!(backoff_secs = backoff.as_secs(), "backing off before retry");
        let stop = self.sleep_or_shutdown(*backoff).await;
        *backoff = (*backoff * 2).min(MAX_BACKOFF);
        stop
    }

    /// Sleeps unless shutdown is signalled first. Returns `true` on shutdown.
    async fn sleep_or_shutdown(&mut self, duration: Duration) -> bool {
        tokio::select! {
            () = tokio::time::sleep(duration) => false,
            changed = self.shutdown.changed() => {
                changed.is_err() || *self.shutdown.borrow()
            }
        }
    }
}
