//! Outbound trading intents.
//!
//! All three operations are fire-and-forget envelope sends: acceptance of
//! the send is the only synchronous outcome, and results arrive later as
//! independent inbound pushes (`position-changed`, `profile`, `candles`).

use tracing::info;

use super::{WsWriter, send_envelope};
use crate::Result;
use crate::models::ServiceRequest;
use crate::models::trade::{CandleHistoryRequest, OpenPositionRequest};

/// Sends a `buyV2` envelope placing a position.
///
/// Confirmation arrives later as a `position-changed` push.
///
/// # Errors
///
/// Returns an [`OpticError`](crate::OpticError) if sending the request fails.
pub async fn open_position(write: &mut WsWriter, request: &OpenPositionRequest) -> Result<()> {
    send_envelope(write, "buyV2", request).await?;
    info!(
        act = request.act,
        direction = ?request.direction,
        exp = request.exp,
        "sent buy intent"
    );

    Ok(())
}

/// Sends an `api_profile_changebalance` envelope switching the active
/// account. The switch is confirmed by a later `profile` push.
///
/// # Errors
///
/// Returns an [`OpticError`](crate::OpticError) if sending the request fails.
pub async fn change_balance(write: &mut WsWriter, balance_id: u64) -> Result<()> {
    send_envelope(
        write,
        "api_profile_changebalance",
        &serde_json::json!({"balance_id": balance_id}),
    )
    .await?;
    info!(balance_id, "sent account change");

    Ok(())
}

/// Sends a `get-candles` service request for a historical range.
/// The answer arrives later as a `candles` push.
///
/// # Errors
///
/// Returns an [`OpticError`](crate::OpticError) if sending the request fails.
pub async fn request_candle_history(
    write: &mut WsWriter,
    request: &CandleHistoryRequest,
) -> Result<()> {
    let body = serde_json::to_value(request)?;
    send_envelope(
        write,
        "sendMessage",
        &ServiceRequest::new("get-candles", "2.0", body),
    )
    .await?;
    info!(
        active_id = request.active_id,
        from_id = request.from_id,
        to_id = request.to_id,
        "requested candle history"
    );

    Ok(())
}
