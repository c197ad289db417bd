//! Static instrument-name ↔ active-id table.
//!
//! The platform addresses every tradable instrument by a numeric "active id"
//! in routing filters and buy requests, while callers and candle caches use
//! the human-readable symbol. This table carries the well-known assignments;
//! `-OTC` entries are the weekend over-the-counter variants.

/// Known (symbol, active id) assignments.
pub const ACTIVES: &[(&str, u32)] = &[
    ("EURUSD", 1),
    ("EURGBP", 2),
    ("GBPJPY", 3),
    ("EURJPY", 4),
    ("GBPUSD", 5),
    ("USDJPY", 6),
    ("AUDCAD", 7),
    ("NZDUSD", 8),
    ("USDRUB", 10),
    ("AMAZON", 30),
    ("APPLE", 31),
    ("BAIDU", 32),
    ("CISCO", 33),
    ("FACEBOOK", 34),
    ("GOOGLE", 35),
    ("INTEL", 36),
    ("MSFT", 37),
    ("CITI", 40),
    ("COKE", 41),
    ("GE", 42),
    ("GM", 43),
    ("GS", 44),
    ("JPM", 45),
    ("MCDON", 46),
    ("MORSTAN", 47),
    ("NIKE", 48),
    ("USDCHF", 72),
    ("XAUUSD", 74),
    ("XAGUSD", 75),
    ("EURUSD-OTC", 76),
    ("EURGBP-OTC", 77),
    ("USDCHF-OTC", 78),
    ("EURJPY-OTC", 79),
    ("NZDUSD-OTC", 80),
    ("GBPUSD-OTC", 81),
    ("GBPJPY-OTC", 84),
    ("USDJPY-OTC", 85),
    ("AUDCAD-OTC", 86),
    ("BTCUSD", 816),
];

/// Resolves a symbol to its active id.
#[must_use]
pub fn active_id(symbol: &str) -> Option<u32> {
    ACTIVES
        .iter()
        .find(|(name, _)| *name == symbol)
        .map(|(_, id)| *id)
}

/// Resolves an active id back to its symbol.
#[must_use]
pub fn instrument_name(id: u32) -> Option<&'static str> {
    ACTIVES
        .iter()
        .find(|(_, active)| *active == id)
        .map(|(name, _)| *name)
}
