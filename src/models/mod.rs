//! Shared models for platform WebSocket messages.
//!
//! Contains instrument category definitions, generic subscription and
//! service-request payloads, and the per-channel message types.

pub mod actives;
pub mod candle;
pub mod chart;
pub mod expiration;
pub mod instrument;
pub mod position;
pub mod profile;
pub mod trade;

use serde::{Deserialize, Serialize};

pub use profile::AccountKind;

/// Instrument categories the platform partitions its catalog into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cfd,
    Forex,
    Crypto,
    Binary,
}

impl Category {
    /// Returns the wire-format category name expected by the platform.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Cfd => "cfd",
            Category::Forex => "forex",
            Category::Crypto => "crypto",
            Category::Binary => "binary",
        }
    }

    /// Categories covered by instrument snapshots and position-change
    /// subscriptions.
    pub const INSTRUMENTS: [Category; 3] = [Category::Cfd, Category::Forex, Category::Crypto];

    /// Categories covered by top-asset snapshots.
    pub const TOP_ASSETS: [Category; 3] = [Category::Forex, Category::Crypto, Category::Binary];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a `subscribeMessage` envelope: a named channel plus routing
/// filters narrowing which events the server pushes.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelSubscription {
    pub name: String,
    pub version: String,
    pub params: RoutingParams,
}

/// Routing filters wrapper used in [`ChannelSubscription`].
#[derive(Debug, Clone, Serialize)]
pub struct RoutingParams {
    #[serde(rename = "routingFilters")]
    pub routing_filters: serde_json::Value,
}

impl ChannelSubscription {
    /// Creates a channel subscription with the given routing filters.
    #[must_use]
    pub fn new(name: &str, version: &str, routing_filters: serde_json::Value) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            params: RoutingParams { routing_filters },
        }
    }
}

/// Payload of a `sendMessage` envelope: a one-shot service request whose
/// answer arrives later as an independent push.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceRequest {
    pub name: String,
    pub version: String,
    pub body: serde_json::Value,
}

impl ServiceRequest {
    /// Creates a service request with the given body.
    #[must_use]
    pub fn new(name: &str, version: &str, body: serde_json::Value) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            body,
        }
    }
}
