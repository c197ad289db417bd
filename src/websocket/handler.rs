//! Incoming message routing.
//!
//! One synchronous dispatch over the envelope `name`, applying exactly one
//! state-store mutation (or a deliberate no-op) per message. Unknown names
//! are dropped silently so new server message types never crash the client.

use tracing::debug;

use crate::Result;
use crate::codec::Envelope;
use crate::state::StateStore;

/// Routes a decoded envelope to its state-store handler.
///
/// # Errors
///
/// Returns an [`OpticError`](crate::OpticError) if the payload does not
/// deserialize into the expected shape, or if the handler detects a
/// consistency violation (unknown account or instrument). The caller logs
/// the error and continues with the next envelope; no handler failure is
/// fatal to the reader.
pub fn dispatch(state: &StateStore, envelope: Envelope) -> Result<()> {
    match envelope.name.as_str() {
        "timeSync" => {
            let ms: f64 = serde_json::from_value(envelope.msg)?;
            state.apply_time_sync(ms);
        }
        // liveness signals only
        "heartbeat" | "tradersPulse" => {}
        "profile" => state.apply_profile(serde_json::from_value(envelope.msg)?)?,
        "position-changed" => state.apply_position_changed(serde_json::from_value(envelope.msg)?),
        "newChartData" => state.apply_chart_data(serde_json::from_value(envelope.msg)?),
        "top-assets" => state.apply_top_assets(serde_json::from_value(envelope.msg)?),
        "instruments" => state.apply_instruments(serde_json::from_value(envelope.msg)?),
        "candle-generated" => {
            state.apply_candle_generated(serde_json::from_value(envelope.msg)?)?;
        }
        "listInfoData" => state.apply_position_list(serde_json::from_value(envelope.msg)?),
        "expiration-list" => state.apply_expiration_list(serde_json::from_value(envelope.msg)?),
        "candles" => state.apply_candle_history(serde_json::from_value(envelope.msg)?),
        name => {
            debug!(name, "ignoring unknown message");
        }
    }

    Ok(())
}
