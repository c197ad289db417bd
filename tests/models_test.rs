//! Serialization tests for outbound request types and shared enums.

use optic::codec::encode;
use optic::models::position::Direction;
use optic::models::trade::{OpenPositionRequest, OptionType};
use optic::models::{Category, actives};
use rust_decimal_macros::dec;

#[test]
fn category_wire_names() {
    assert_eq!(Category::Cfd.as_str(), "cfd");
    assert_eq!(Category::Forex.as_str(), "forex");
    assert_eq!(Category::Crypto.as_str(), "crypto");
    assert_eq!(Category::Binary.as_str(), "binary");
}

#[test]
fn category_lists_cover_the_bootstrap_requests() {
    assert_eq!(
        Category::INSTRUMENTS,
        [Category::Cfd, Category::Forex, Category::Crypto]
    );
    assert_eq!(
        Category::TOP_ASSETS,
        [Category::Forex, Category::Crypto, Category::Binary]
    );
}

#[test]
fn actives_resolve_in_both_directions() {
    assert_eq!(actives::active_id("EURUSD"), Some(1));
    assert_eq!(actives::instrument_name(1), Some("EURUSD"));
    assert_eq!(actives::active_id("EURUSD-OTC"), Some(76));
    assert_eq!(actives::active_id("nope"), None);
}

#[test]
fn buy_envelope_has_wire_shape() {
    let request = OpenPositionRequest::new(
        42,
        dec!(25),
        Direction::Put,
        1_700_000_000,
        1_700_000_300,
        76,
        OptionType::Binary,
    );

    let frame = encode("buyV2", &request).unwrap();
    let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(value["name"], "buyV2");
    let msg = &value["msg"];
    assert_eq!(msg["user_balance_id"], 42);
    assert_eq!(msg["direction"], "put");
    assert_eq!(msg["platform"], "9");
    assert_eq!(msg["time"], 1_700_000_000i64);
    assert_eq!(msg["exp"], 1_700_000_300i64);
    assert_eq!(msg["act"], 76);
    assert_eq!(msg["type"], "binary");
}

#[test]
fn option_type_wire_names() {
    assert_eq!(serde_json::to_value(OptionType::Turbo).unwrap(), "turbo");
    assert_eq!(
        serde_json::to_value(OptionType::DigitalOption).unwrap(),
        "digital-option"
    );
}

#[test]
fn direction_round_trips() {
    for (direction, wire) in [(Direction::Call, "call"), (Direction::Put, "put")] {
        assert_eq!(serde_json::to_value(direction).unwrap(), wire);
        assert_eq!(
            serde_json::from_value::<Direction>(serde_json::Value::String(wire.to_string()))
                .unwrap(),
            direction
        );
    }
}
