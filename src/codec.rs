//! Wire envelope encoding and decoding.
//!
//! Every frame in both directions is a JSON object shaped
//! `{"name": <string>, "msg": <payload>}`. The codec is a pure transform
//! with no connection state.

use serde::{Deserialize, Serialize};

/// The `{name, msg}` unit of both outbound and inbound communication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub name: String,
    #[serde(default)]
    pub msg: serde_json::Value,
}

/// Serializes an outbound envelope to a JSON text frame.
///
/// # Errors
///
/// Returns [`OpticError::Json`](crate::OpticError::Json) if the payload
/// cannot be serialized.
pub fn encode<T: Serialize>(name: &str, msg: &T) -> crate::Result<String> {
    let envelope = serde_json::json!({
        "name": name,
        "msg": msg,
    });
    Ok(serde_json::to_string(&envelope)?)
}

/// Deserializes an inbound text frame into an [`Envelope`].
///
/// # Errors
///
/// Returns [`OpticError::MalformedMessage`](crate::OpticError::MalformedMessage)
/// if the frame is not valid JSON or lacks a `name` field.
pub fn decode(text: &str) -> crate::Result<Envelope> {
    serde_json::from_str(text)
        .map_err(|e| crate::OpticError::MalformedMessage(e.to_string()))
}
