//! Table-policy tests: every mutation is driven through the dispatch
//! router exactly as envelopes arriving off the wire would be.

mod common;

use common::{envelope, position_payload};
use optic::models::profile::{AccountBalance, AccountProfile};
use optic::models::position::Direction;
use optic::models::{AccountKind, Category};
use optic::state::StateStore;
use optic::websocket::dispatch;
use rust_decimal_macros::dec;

fn store_with_profile() -> StateStore {
    let store = StateStore::new();
    store.set_profile(AccountProfile {
        currency: "USD".to_string(),
        real: Some(AccountBalance {
            id: 10,
            balance: dec!(100),
        }),
        practice: Some(AccountBalance {
            id: 20,
            balance: dec!(10000),
        }),
        active: AccountKind::Practice,
        group_code: 4,
    });
    store
}

#[test]
fn time_sync_stores_floored_seconds() {
    let store = StateStore::new();
    dispatch(&store, envelope("timeSync", serde_json::json!(1_700_000_042_999i64))).unwrap();
    assert_eq!(store.server_time(), Some(1_700_000_042));
}

#[test]
fn position_changed_merges_by_id_last_writer_wins() {
    let store = StateStore::new();
    dispatch(&store, envelope("position-changed", position_payload(7, "open"))).unwrap();
    dispatch(
        &store,
        envelope(
            "position-changed",
            serde_json::json!({"id": 7, "status": "closed", "close_reason": "expired"}),
        ),
    )
    .unwrap();

    let position = store.position(7).unwrap();
    assert_eq!(position.status.as_deref(), Some("closed"));
    assert_eq!(position.close_reason.as_deref(), Some("expired"));
    // fields absent from the second update survive from the first
    assert_eq!(position.direction, Some(Direction::Call));
    assert_eq!(position.price, Some(dec!(25.0)));
    assert_eq!(position.active_id, Some(1));
}

#[test]
fn position_changed_keeps_distinct_ids_separate() {
    let store = StateStore::new();
    dispatch(&store, envelope("position-changed", position_payload(1, "open"))).unwrap();
    dispatch(&store, envelope("position-changed", position_payload(2, "open"))).unwrap();
    assert_eq!(store.positions().len(), 2);
}

#[test]
fn list_info_data_replaces_positions_wholesale() {
    let store = StateStore::new();
    dispatch(&store, envelope("position-changed", position_payload(7, "open"))).unwrap();

    // bulk overwrite carries no direction/price: they must not survive
    dispatch(
        &store,
        envelope(
            "listInfoData",
            serde_json::json!([{"id": 7, "status": "closed"}]),
        ),
    )
    .unwrap();

    let position = store.position(7).unwrap();
    assert_eq!(position.status.as_deref(), Some("closed"));
    assert_eq!(position.direction, None);
    assert_eq!(position.price, None);
}

#[test]
fn instruments_fully_replace_per_category() {
    let store = StateStore::new();
    dispatch(
        &store,
        envelope(
            "instruments",
            serde_json::json!({
                "type": "forex",
                "instruments": [{"id": 1, "active_id": 1}, {"id": 5, "active_id": 5}],
            }),
        ),
    )
    .unwrap();
    dispatch(
        &store,
        envelope(
            "instruments",
            serde_json::json!({
                "type": "forex",
                "instruments": [{"id": 6, "active_id": 6}],
            }),
        ),
    )
    .unwrap();

    let table = store.instruments(Category::Forex);
    assert_eq!(table.len(), 1, "no trace of the first snapshot may remain");
    assert!(table.contains_key(&6));
    assert!(!table.contains_key(&1));
}

#[test]
fn instruments_categories_are_independent() {
    let store = StateStore::new();
    dispatch(
        &store,
        envelope(
            "instruments",
            serde_json::json!({
                "type": "forex",
                "instruments": [{"id": 1, "active_id": 1}],
            }),
        ),
    )
    .unwrap();
    dispatch(
        &store,
        envelope(
            "instruments",
            serde_json::json!({
                "type": "crypto",
                "instruments": [{"id": 816, "active_id": 816}],
            }),
        ),
    )
    .unwrap();

    assert_eq!(store.instruments(Category::Forex).len(), 1);
    assert_eq!(store.instruments(Category::Crypto).len(), 1);
}

#[test]
fn top_assets_fully_replace_per_category() {
    let store = StateStore::new();
    dispatch(
        &store,
        envelope(
            "top-assets",
            serde_json::json!({
                "instrument_type": "binary",
                "data": [{"active_id": 1}, {"active_id": 5}],
            }),
        ),
    )
    .unwrap();
    dispatch(
        &store,
        envelope(
            "top-assets",
            serde_json::json!({
                "instrument_type": "binary",
                "data": [{"active_id": 76}],
            }),
        ),
    )
    .unwrap();

    let assets = store.top_assets(Category::Binary);
    assert_eq!(assets.len(), 1);
    assert!(assets.contains(&76));
}

#[test]
fn expiration_list_keeps_only_future_entries() {
    let store = StateStore::new();
    dispatch(&store, envelope("timeSync", serde_json::json!(1_700_000_000_000i64))).unwrap();
    dispatch(
        &store,
        envelope(
            "expiration-list",
            serde_json::json!({
                "underlying": "EURUSD",
                "expiration": [
                    {"time": 1_699_999_940_000i64},  // past
                    {"time": 1_700_000_000_000i64},  // exactly now: not strictly future
                    {"time": 1_700_000_060_000i64},  // future
                ],
            }),
        ),
    )
    .unwrap();

    let entries = store.expirations("EURUSD");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].time, 1_700_000_060, "stored in seconds");
}

#[test]
fn all_past_expiration_list_stores_empty() {
    let store = StateStore::new();
    dispatch(&store, envelope("timeSync", serde_json::json!(1_700_000_000_000i64))).unwrap();
    dispatch(
        &store,
        envelope(
            "expiration-list",
            serde_json::json!({
                "underlying": "EURUSD",
                "expiration": [
                    {"time": 1_600_000_000_000i64},
                    {"time": 1_600_000_060_000i64},
                ],
            }),
        ),
    )
    .unwrap();

    assert!(store.expirations("EURUSD").is_empty());
}

#[test]
fn chart_data_appends_per_symbol_and_time() {
    let store = StateStore::new();
    for (symbol, time, value) in [
        ("EURUSD", 100, "1.10"),
        ("EURUSD", 101, "1.11"),
        ("GBPUSD", 100, "1.27"),
    ] {
        dispatch(
            &store,
            envelope(
                "newChartData",
                serde_json::json!({"symbol": symbol, "time": time, "value": value}),
            ),
        )
        .unwrap();
    }

    assert_eq!(store.chart_data("EURUSD").len(), 2);
    assert_eq!(store.chart_data("GBPUSD").len(), 1);
    assert_eq!(
        store.chart_data("EURUSD")[&101].value,
        Some(dec!(1.11))
    );
}

#[test]
fn profile_update_switches_active_account() {
    let store = store_with_profile();
    dispatch(
        &store,
        envelope(
            "profile",
            serde_json::json!({"balance": 97.25, "balance_id": 10, "currency": "EUR"}),
        ),
    )
    .unwrap();

    let profile = store.profile().unwrap();
    assert_eq!(profile.active, AccountKind::Real);
    assert_eq!(profile.group_code, 1);
    assert_eq!(profile.currency, "EUR");
    assert_eq!(store.balance(AccountKind::Real), Some(dec!(97.25)));
    // the other account is untouched
    assert_eq!(store.balance(AccountKind::Practice), Some(dec!(10000)));
}

#[test]
fn profile_update_without_balance_fields_is_ignored() {
    let store = store_with_profile();
    dispatch(&store, envelope("profile", serde_json::json!({"skey": "x"}))).unwrap();
    assert_eq!(store.active_account(), Some(AccountKind::Practice));
}

#[test]
fn profile_update_with_unknown_id_fails_and_leaves_state_unmodified() {
    let store = store_with_profile();
    let before = store.profile().unwrap();

    let err = dispatch(
        &store,
        envelope(
            "profile",
            serde_json::json!({"balance": 1, "balance_id": 999}),
        ),
    )
    .unwrap_err();

    assert!(matches!(err, optic::OpticError::UnknownAccount(999)));
    assert_eq!(store.profile().unwrap(), before);
}

#[test]
fn candle_generated_overwrites_latest_live_candle() {
    let store = StateStore::new();
    for (id, close) in [(100u64, "1.10"), (101, "1.12")] {
        dispatch(
            &store,
            envelope(
                "candle-generated",
                serde_json::json!({
                    "active_id": 1,
                    "size": 60,
                    "id": id,
                    "from": 1_700_000_000i64,
                    "to": 1_700_000_060i64,
                    "open": "1.10",
                    "close": close,
                    "min": "1.09",
                    "max": "1.13",
                }),
            ),
        )
        .unwrap();
    }

    let latest = store.live_candle("EURUSD").unwrap();
    assert_eq!(latest.id, 101);
    assert_eq!(latest.close, dec!(1.12));
}

#[test]
fn candle_generated_for_unknown_active_id_fails() {
    let store = StateStore::new();
    let err = dispatch(
        &store,
        envelope(
            "candle-generated",
            serde_json::json!({
                "active_id": 9_999,
                "size": 60,
                "id": 1,
                "from": 0,
                "to": 60,
                "open": "1",
                "close": "1",
                "min": "1",
                "max": "1",
            }),
        ),
    )
    .unwrap_err();
    assert!(matches!(err, optic::OpticError::UnknownInstrument(_)));
}

#[test]
fn unknown_envelope_names_are_ignored() {
    let store = StateStore::new();
    dispatch(
        &store,
        envelope("front-office-brand-new", serde_json::json!({"whatever": true})),
    )
    .unwrap();
    dispatch(&store, envelope("heartbeat", serde_json::json!(null))).unwrap();
    dispatch(&store, envelope("tradersPulse", serde_json::json!({}))).unwrap();
    assert!(store.positions().is_empty());
    assert_eq!(store.server_time(), None);
}

#[test]
fn malformed_payload_fails_without_poisoning_later_messages() {
    let store = StateStore::new();
    assert!(dispatch(&store, envelope("timeSync", serde_json::json!("not a number"))).is_err());
    dispatch(&store, envelope("timeSync", serde_json::json!(5_000))).unwrap();
    assert_eq!(store.server_time(), Some(5));
}
