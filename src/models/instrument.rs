//! Instrument catalog and top-asset snapshot models.

use serde::Deserialize;

use super::Category;

/// An `instruments` push: the complete catalog for one category. The
/// server sends a full snapshot, never a delta.
#[derive(Debug, Clone, Deserialize)]
pub struct InstrumentsMessage {
    #[serde(rename = "type")]
    pub category: Category,
    pub instruments: Vec<Instrument>,
}

/// One tradable instrument.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Instrument {
    pub id: u32,
    pub active_id: u32,
    #[serde(default)]
    pub name: Option<String>,
}

/// A `top-assets` push: the currently featured active ids for one category.
#[derive(Debug, Clone, Deserialize)]
pub struct TopAssetsMessage {
    pub instrument_type: Category,
    pub data: Vec<TopAsset>,
}

/// One featured asset entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TopAsset {
    pub active_id: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruments_message_deserializes() {
        let msg: InstrumentsMessage = serde_json::from_value(serde_json::json!({
            "type": "forex",
            "instruments": [
                {"id": 1, "active_id": 1, "name": "EUR/USD"},
                {"id": 5, "active_id": 5},
            ],
        }))
        .unwrap();
        assert_eq!(msg.category, Category::Forex);
        assert_eq!(msg.instruments.len(), 2);
        assert_eq!(msg.instruments[0].name.as_deref(), Some("EUR/USD"));
        assert!(msg.instruments[1].name.is_none());
    }

    #[test]
    fn top_assets_message_deserializes() {
        let msg: TopAssetsMessage = serde_json::from_value(serde_json::json!({
            "instrument_type": "binary",
            "data": [{"active_id": 76}, {"active_id": 81}],
        }))
        .unwrap();
        assert_eq!(msg.instrument_type, Category::Binary);
        assert_eq!(msg.data[1].active_id, 81);
    }
}
