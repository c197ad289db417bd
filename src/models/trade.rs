//! Outbound trading request models.
//!
//! Both requests are fire-and-forget: `buyV2` is confirmed later by a
//! `position-changed` push, `get-candles` is answered by a `candles` push.

use rust_decimal::Decimal;
use serde::Serialize;

use super::position::Direction;

/// Option contract flavor for a buy intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionType {
    Turbo,
    Binary,
    DigitalOption,
}

/// Client platform identifier sent with buy intents.
const PLATFORM_ID: &str = "9";

/// Payload of a `buyV2` envelope.
#[derive(Debug, Clone, Serialize)]
pub struct OpenPositionRequest {
    pub user_balance_id: u64,
    pub price: Decimal,
    pub direction: Direction,
    pub platform: &'static str,
    /// Current server time in epoch seconds.
    pub time: i64,
    /// Expiration time in epoch seconds.
    pub exp: i64,
    /// Active id of the instrument being traded.
    pub act: u32,
    #[serde(rename = "type")]
    pub option_type: OptionType,
}

impl OpenPositionRequest {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_balance_id: u64,
        price: Decimal,
        direction: Direction,
        time: i64,
        exp: i64,
        act: u32,
        option_type: OptionType,
    ) -> Self {
        Self {
            user_balance_id,
            price,
            direction,
            platform: PLATFORM_ID,
            time,
            exp,
            act,
            option_type,
        }
    }
}

/// Body of a `get-candles` service request. `from_id`/`to_id` are
/// server-assigned bar ids counted back from the latest live candle.
#[derive(Debug, Clone, Serialize)]
pub struct CandleHistoryRequest {
    pub active_id: u32,
    /// Bar duration in seconds.
    pub size: u32,
    pub from_id: u64,
    pub to_id: u64,
    pub only_closed: bool,
}
