//! Standing subscriptions and reconnect replay.
//!
//! A [`SubscriptionSet`] tracks every channel/filter pair the session wants
//! to keep alive. After each (re)connection the whole set is replayed on
//! top of a fixed bootstrap sequence, so the state store reconverges to the
//! server's truth regardless of how many disconnects happened in between.
//!
//! Message construction is split from sending ([`bootstrap_messages`],
//! [`replay_messages`]) so replay content is testable without a socket.

use futures_util::SinkExt;
use tracing::info;
use tungstenite::Message;

use super::WsWriter;
use crate::Result;
use crate::codec;
use crate::models::{Category, ChannelSubscription, ServiceRequest};

/// One standing subscription, re-established after every reconnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subscription {
    /// Live quote stream for an instrument.
    Quotes { active_id: u32 },
    /// Live candle stream for an instrument at one bar size (seconds).
    Candles { active_id: u32, size: u32 },
    /// Digital-option expiration windows for an underlying.
    Expirations { underlying: String },
}

impl Subscription {
    /// Builds the encoded wire frame establishing this subscription.
    ///
    /// # Errors
    ///
    /// Returns an [`OpticError`](crate::OpticError) if serialization fails.
    pub fn message(&self) -> Result<String> {
        match self {
            Subscription::Quotes { active_id } => codec::encode(
                "subscribeMessage",
                &ChannelSubscription::new(
                    "quote-generated",
                    "1.0",
                    serde_json::json!({"active_id": active_id}),
                ),
            ),
            Subscription::Candles { active_id, size } => codec::encode(
                "subscribeMessage",
                &ChannelSubscription::new(
                    "candle-generated",
                    "1.0",
                    serde_json::json!({"active_id": active_id, "size": size}),
                ),
            ),
            Subscription::Expirations { underlying } => codec::encode(
                "sendMessage",
                &ServiceRequest::new(
                    "get-expiration-list",
                    "3.0",
                    serde_json::json!({"type": "digital-option", "underlying": underlying}),
                ),
            ),
        }
    }
}

/// Ordered, deduplicated set of standing subscriptions.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    entries: Vec<Subscription>,
}

impl SubscriptionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subscription, returning `false` if it was already present.
    pub fn add(&mut self, subscription: Subscription) -> bool {
        if self.entries.contains(&subscription) {
            return false;
        }
        self.entries.push(subscription);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subscription> {
        self.entries.iter()
    }
}

/// Builds the fixed bootstrap frames sent after every connect: the
/// tradersPulse feed, per-category position-change subscriptions, and
/// instrument/top-asset snapshot requests.
///
/// # Errors
///
/// Returns an [`OpticError`](crate::OpticError) if serialization fails.
pub fn bootstrap_messages() -> Result<Vec<String>> {
    let mut messages = vec![codec::encode("subscribe", &"tradersPulse")?];

    for category in Category::INSTRUMENTS {
        messages.push(codec::encode(
            "subscribeMessage",
            &ChannelSubscription::new(
                "position-changed",
                "1.0",
                serde_json::json!({"instrument_type": category.as_str()}),
            ),
        )?);
    }
    for category in Category::INSTRUMENTS {
        messages.push(codec::encode(
            "sendMessage",
            &ServiceRequest::new(
                "get-instruments",
                "1.0",
                serde_json::json!({"type": category.as_str()}),
            ),
        )?);
    }
    for category in Category::TOP_ASSETS {
        messages.push(codec::encode(
            "sendMessage",
            &ServiceRequest::new(
                "get-top-assets",
                "1.1",
                serde_json::json!({"instrument_type": category.as_str()}),
            ),
        )?);
    }

    Ok(messages)
}

/// Builds the complete replay sequence: bootstrap frames followed by every
/// standing subscription, in insertion order, with no duplicates.
///
/// # Errors
///
/// Returns an [`OpticError`](crate::OpticError) if serialization fails.
pub fn replay_messages(subscriptions: &SubscriptionSet) -> Result<Vec<String>> {
    let mut messages = bootstrap_messages()?;
    for subscription in subscriptions.iter() {
        messages.push(subscription.message()?);
    }
    Ok(messages)
}

/// Sends the session token envelope, the first frame after every connect.
///
/// # Errors
///
/// Returns an [`OpticError`](crate::OpticError) if the send fails.
pub async fn authenticate(write: &mut WsWriter, ssid: &str) -> Result<()> {
    super::send_envelope(write, "ssid", &ssid).await?;
    info!("sent session token");

    Ok(())
}

/// Replays bootstrap and standing subscriptions on a fresh connection.
///
/// # Errors
///
/// Returns an [`OpticError`](crate::OpticError) if any send fails.
pub async fn replay(write: &mut WsWriter, subscriptions: &SubscriptionSet) -> Result<()> {
    let messages = replay_messages(subscriptions)?;
    let count = messages.len();
    for message in messages {
        write.send(Message::Text(message.into())).await?;
    }
    info!(
        frames = count,
        standing = subscriptions.len(),
        "replayed subscriptions"
    );

    Ok(())
}
