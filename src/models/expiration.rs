//! Digital-option expiration window models.

use serde::Deserialize;

/// An `expiration-list` push for one underlying. Entry times arrive in
/// milliseconds and are normalized to seconds before storage.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpirationListMessage {
    pub underlying: String,
    #[serde(default)]
    pub expiration: Vec<ExpirationEntry>,
}

/// One expiration window. After normalization `time` is epoch seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExpirationEntry {
    pub time: i64,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiration_list_deserializes() {
        let msg: ExpirationListMessage = serde_json::from_value(serde_json::json!({
            "underlying": "EURUSD",
            "expiration": [
                {"time": 1_700_000_060_000i64, "type": "PT1M"},
                {"time": 1_700_000_300_000i64},
            ],
        }))
        .unwrap();
        assert_eq!(msg.underlying, "EURUSD");
        assert_eq!(msg.expiration[0].kind.as_deref(), Some("PT1M"));
        assert_eq!(msg.expiration[1].time, 1_700_000_300_000);
    }

    #[test]
    fn missing_expiration_array_defaults_empty() {
        let msg: ExpirationListMessage =
            serde_json::from_value(serde_json::json!({"underlying": "EURUSD"})).unwrap();
        assert!(msg.expiration.is_empty());
    }
}
