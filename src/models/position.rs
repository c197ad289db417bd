//! Open-position models and merge semantics.
//!
//! `position-changed` pushes arrive as partial snapshots: repeat messages
//! for the same id carry only the fields that changed. [`Position::merge`]
//! therefore overwrites only the fields present in an update, while
//! `listInfoData` elements replace positions wholesale.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Call,
    Put,
}

/// One open trade, keyed by its server-assigned id. Positions are never
/// deleted here; closure is observed through the status fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Position {
    pub id: u64,
    pub active_id: Option<u32>,
    pub instrument_type: Option<String>,
    pub direction: Option<Direction>,
    pub price: Option<Decimal>,
    pub expiration: Option<i64>,
    pub status: Option<String>,
    pub current_value: Option<Decimal>,
    pub close_reason: Option<String>,
}

/// A `position-changed` push (also the element shape of `listInfoData`).
/// Every field but `id` is optional on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionUpdate {
    pub id: u64,
    #[serde(default)]
    pub active_id: Option<u32>,
    #[serde(default)]
    pub instrument_type: Option<String>,
    #[serde(default)]
    pub direction: Option<Direction>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub expiration: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub current_value: Option<Decimal>,
    #[serde(default)]
    pub close_reason: Option<String>,
}

impl Position {
    /// Applies an update, overwriting only the fields it carries.
    pub fn merge(&mut self, update: PositionUpdate) {
        debug_assert_eq!(self.id, update.id);
        if let Some(v) = update.active_id {
            self.active_id = Some(v);
        }
        if let Some(v) = update.instrument_type {
            self.instrument_type = Some(v);
        }
        if let Some(v) = update.direction {
            self.direction = Some(v);
        }
        if let Some(v) = update.price {
            self.price = Some(v);
        }
        if let Some(v) = update.expiration {
            self.expiration = Some(v);
        }
        if let Some(v) = update.status {
            self.status = Some(v);
        }
        if let Some(v) = update.current_value {
            self.current_value = Some(v);
        }
        if let Some(v) = update.close_reason {
            self.close_reason = Some(v);
        }
    }
}

impl From<PositionUpdate> for Position {
    fn from(update: PositionUpdate) -> Self {
        Self {
            id: update.id,
            active_id: update.active_id,
            instrument_type: update.instrument_type,
            direction: update.direction,
            price: update.price,
            expiration: update.expiration,
            status: update.status,
            current_value: update.current_value,
            close_reason: update.close_reason,
        }
    }
}
