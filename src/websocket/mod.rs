//! Async WebSocket client for the platform's realtime feed.
//!
//! This module is organized by domain:
//! - [`connection`] - Connection lifecycle, reconnection, and the reader loop
//! - [`subscription`] - Standing subscriptions and reconnect replay
//! - [`trading`] - Outbound trading intents
//! - [`handler`] - Incoming message routing

pub mod connection;
mod handler;
pub mod subscription;
pub mod trading;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::net::TcpStream;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};
use tungstenite::Message;

use crate::Result;
use crate::codec;

pub use handler::dispatch;
pub use subscription::{Subscription, SubscriptionSet};

/// Write half of a platform WebSocket connection.
pub type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Read half of a platform WebSocket connection.
pub type WsReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Establishes a WebSocket connection to the given URL.
///
/// # Errors
///
/// Returns an [`OpticError`](crate::OpticError) if the connection or TLS
/// handshake fails.
pub async fn connect(url: &str) -> Result<(WsWriter, WsReader)> {
    let (ws_stream, _) = connect_async(url).await?;
    info!("WebSocket handshake completed");

    Ok(ws_stream.split())
}

/// Encodes and sends one `{name, msg}` envelope.
///
/// # Errors
///
/// Returns an [`OpticError`](crate::OpticError) if encoding or the send
/// fails.
pub async fn send_envelope<T: Serialize>(
    write: &mut WsWriter,
    name: &str,
    msg: &T,
) -> Result<()> {
    let json = codec::encode(name, msg)?;
    write.send(Message::Text(json.into())).await?;
    debug!(name, "sent envelope");

    Ok(())
}
