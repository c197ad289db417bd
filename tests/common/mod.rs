//! Shared test utilities.

use optic::codec::Envelope;

/// Builds an inbound envelope from a name and JSON payload.
pub fn envelope(name: &str, msg: serde_json::Value) -> Envelope {
    Envelope {
        name: name.to_string(),
        msg,
    }
}

/// A minimal `position-changed` payload for the given id.
pub fn position_payload(id: u64, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "active_id": 1,
        "instrument_type": "forex",
        "direction": "call",
        "price": "25.0",
        "status": status,
    })
}
