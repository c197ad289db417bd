//! Platform authentication and profile snapshot retrieval.
//!
//! Two one-shot HTTPS exchanges: the login call trades credentials for an
//! `ssid` session cookie (later replayed over the WebSocket), and the
//! registration-data call returns the profile snapshot that seeds the
//! session's account mapping.

use reqwest::header;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::Result;
use crate::config::PlatformConfig;
use crate::models::profile::{AccountBalance, AccountKind, AccountProfile};

/// Central login endpoint, independent of the configured host.
const LOGIN_URL: &str = "https://auth.iqoption.com/api/v1.0/login";

/// Client platform identifier cookie expected on API requests.
const PLATFORM_COOKIE: &str = "platform=9";

/// Snapshot amounts arrive scaled by one million.
const BALANCE_SCALE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Exchanges credentials for a session token.
///
/// The response body must carry a `data` object and the response cookies
/// must include `ssid`; anything else is an authentication rejection.
///
/// # Errors
///
/// Returns [`OpticError::Auth`](crate::OpticError::Auth) on rejection, or
/// [`OpticError::Http`](crate::OpticError::Http) on transport failure.
pub async fn login(client: &reqwest::Client, config: &PlatformConfig) -> Result<String> {
    let response = client
        .post(LOGIN_URL)
        .form(&[
            ("email", config.email.as_str()),
            ("password", config.password.as_str()),
        ])
        .send()
        .await?;

    let ssid = response
        .cookies()
        .find(|cookie| cookie.name() == "ssid")
        .map(|cookie| cookie.value().to_string());

    let body: serde_json::Value = response.json().await?;
    if body.get("data").is_none_or(serde_json::Value::is_null) {
        return Err(crate::OpticError::Auth(
            "login response carried no data".to_string(),
        ));
    }

    let ssid = ssid.ok_or_else(|| {
        crate::OpticError::Auth("login response carried no ssid cookie".to_string())
    })?;

    info!("authenticated, session established");
    Ok(ssid)
}

#[derive(Deserialize)]
struct RegData {
    #[serde(rename = "isSuccessful")]
    is_successful: bool,
    #[serde(default)]
    result: Option<RegResult>,
}

#[derive(Deserialize)]
struct RegResult {
    profile: ProfileSnapshot,
}

#[derive(Deserialize)]
struct ProfileSnapshot {
    balances: Vec<BalanceSnapshot>,
    currency: String,
    balance_type: u8,
}

#[derive(Deserialize)]
struct BalanceSnapshot {
    id: u64,
    amount: Decimal,
}

/// Fetches and parses the profile snapshot for the authenticated session.
///
/// # Errors
///
/// Returns [`OpticError::Auth`](crate::OpticError::Auth) if the platform
/// reports the fetch as unsuccessful, or
/// [`OpticError::MalformedMessage`](crate::OpticError::MalformedMessage)
/// if the snapshot lacks the expected structure.
pub async fn fetch_profile(
    client: &reqwest::Client,
    config: &PlatformConfig,
    ssid: &str,
) -> Result<AccountProfile> {
    let response = client
        .get(config.profile_url())
        .header(header::COOKIE, format!("ssid={ssid}; {PLATFORM_COOKIE}"))
        .send()
        .await?;

    let body: RegData = response.error_for_status()?.json().await?;
    if !body.is_successful {
        return Err(crate::OpticError::Auth(
            "profile fetch reported failure".to_string(),
        ));
    }
    let snapshot = body
        .result
        .ok_or_else(|| {
            crate::OpticError::MalformedMessage("profile response carried no result".to_string())
        })?
        .profile;

    let profile = parse_profile(snapshot);
    info!(
        currency = %profile.currency,
        active = %profile.active,
        "profile snapshot loaded"
    );
    Ok(profile)
}

/// Builds the account table from a raw snapshot.
///
/// The balances array is a fixed positional contract: index 0 is the real
/// account, index 1 the practice account.
fn parse_profile(snapshot: ProfileSnapshot) -> AccountProfile {
    let scaled = |balance: &BalanceSnapshot| AccountBalance {
        id: balance.id,
        balance: balance.amount / BALANCE_SCALE,
    };
    let real = snapshot.balances.first().map(scaled);
    let practice = snapshot.balances.get(1).map(scaled);
    let active = if snapshot.balance_type == 1 {
        AccountKind::Real
    } else {
        AccountKind::Practice
    };

    AccountProfile {
        currency: snapshot.currency,
        real,
        practice,
        active,
        group_code: snapshot.balance_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn snapshot(balance_type: u8) -> ProfileSnapshot {
        serde_json::from_value(serde_json::json!({
            "balances": [
                {"id": 10, "amount": 125_500_000},
                {"id": 20, "amount": 10_000_000_000i64},
            ],
            "currency": "USD",
            "balance_type": balance_type,
        }))
        .unwrap()
    }

    #[test]
    fn parse_profile_scales_and_orders_balances() {
        let profile = parse_profile(snapshot(1));
        assert_eq!(
            profile.real,
            Some(AccountBalance {
                id: 10,
                balance: dec!(125.5),
            })
        );
        assert_eq!(
            profile.practice,
            Some(AccountBalance {
                id: 20,
                balance: dec!(10000),
            })
        );
        assert_eq!(profile.active, AccountKind::Real);
        assert_eq!(profile.group_code, 1);
    }

    #[test]
    fn non_real_balance_type_activates_practice() {
        let profile = parse_profile(snapshot(4));
        assert_eq!(profile.active, AccountKind::Practice);
    }

    #[test]
    fn single_balance_leaves_practice_absent() {
        let snapshot: ProfileSnapshot = serde_json::from_value(serde_json::json!({
            "balances": [{"id": 10, "amount": 1_000_000}],
            "currency": "EUR",
            "balance_type": 1,
        }))
        .unwrap();
        let profile = parse_profile(snapshot);
        assert_eq!(profile.real.map(|a| a.balance), Some(dec!(1)));
        assert!(profile.practice.is_none());
    }
}
