//! Raw chart tick models.

use rust_decimal::Decimal;
use serde::Deserialize;

/// A `newChartData` push: one per-symbol, per-instant quote snapshot.
/// Ticks are appended to the symbol's series and never replaced.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartTick {
    pub symbol: String,
    pub time: i64,
    #[serde(default)]
    pub value: Option<Decimal>,
    #[serde(default)]
    pub buy: Option<Decimal>,
    #[serde(default)]
    pub sell: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn chart_tick_deserializes_partial_quotes() {
        let tick: ChartTick = serde_json::from_value(serde_json::json!({
            "symbol": "EURUSD",
            "time": 1_700_000_042,
            "value": 1.1003,
        }))
        .unwrap();
        assert_eq!(tick.symbol, "EURUSD");
        assert_eq!(tick.value, Some(dec!(1.1003)));
        assert!(tick.buy.is_none());
    }
}
