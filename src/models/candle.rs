//! OHLC candle models: live pushes and historical series.

use rust_decimal::Decimal;
use serde::Deserialize;

/// One closed bar from a `candles` historical response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Candle {
    /// Server-assigned sequential bar id, used to compute pagination
    /// offsets for further historical fetches.
    pub id: u64,
    pub from: i64,
    pub to: i64,
    pub open: Decimal,
    pub close: Decimal,
    pub min: Decimal,
    pub max: Decimal,
    #[serde(default)]
    pub volume: Decimal,
}

/// The in-progress bar pushed on `candle-generated` for a subscribed market.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CandleUpdate {
    pub active_id: u32,
    /// Bar duration in seconds.
    pub size: u32,
    pub id: u64,
    pub from: i64,
    pub to: i64,
    pub open: Decimal,
    pub close: Decimal,
    pub min: Decimal,
    pub max: Decimal,
    #[serde(default)]
    pub volume: Decimal,
}

/// A `candles` response payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CandleHistory {
    #[serde(default)]
    pub candles: Vec<Candle>,
}
