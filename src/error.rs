//! Crate-level error types.
//!
//! [`OpticError`] unifies every error source (configuration, HTTP, WebSocket,
//! JSON, state-consistency violations) behind a single enum so callers can
//! match on the variant they care about while still using the `?` operator
//! for easy propagation.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, OpticError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum OpticError {
    /// A required configuration value is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The login exchange was rejected by the platform. Fatal to the
    /// session; never retried.
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// An HTTPS request (login, profile fetch) failed at the transport level.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A WebSocket operation (connect, send, receive) failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// An inbound frame or HTTP body did not have the expected structure.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// An outbound send was attempted while no connection is established.
    #[error("not connected")]
    NotConnected,

    /// A `profile` message referenced a balance id that is not part of the
    /// session's account mapping. Indicates a credential/profile desync;
    /// state is left untouched for the offending message.
    #[error("unknown account id {0}")]
    UnknownAccount(u64),

    /// The requested account kind has no entry in the session profile.
    #[error("no {0} account on this profile")]
    UnknownAccountKind(crate::models::AccountKind),

    /// An instrument name or active id could not be resolved.
    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),

    /// A historical candle fetch was requested for a market with no live
    /// candle subscription.
    #[error("not subscribed to candles for {0}")]
    NotSubscribed(String),

    /// A historical candle fetch is already in flight; fetches are
    /// serialized one at a time.
    #[error("historical candle fetch already pending for {0}")]
    FetchPending(String),
}
