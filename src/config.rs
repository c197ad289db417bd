//! Application configuration loaded from environment variables.
//!
//! Credentials **must** be provided via environment variables:
//! - `OPTIC_EMAIL` — account email for platform authentication
//! - `OPTIC_PASSWORD` — account password
//!
//! An optional `OPTIC_HOST` overrides the default platform host, and
//! `OPTIC_SETTLE_MS` adjusts the post-connect settle delay.

use std::time::Duration;

/// Default platform host serving both the REST API and the WebSocket feed.
const DEFAULT_HOST: &str = "iqoption.com";

/// Default settle delay between sending the session token and replaying
/// subscriptions. The upstream protocol has no readiness acknowledgment,
/// so this bounded delay is a documented approximation.
const DEFAULT_SETTLE_MS: u64 = 2000;

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub platform: PlatformConfig,
}

/// Platform-specific configuration values.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub host: String,
    pub email: String,
    pub password: String,
    /// Bounded delay after authentication before subscriptions are replayed.
    pub settle: Duration,
}

impl PlatformConfig {
    /// WebSocket endpoint for the realtime feed.
    #[must_use]
    pub fn websocket_url(&self) -> String {
        format!("wss://{}/echo/websocket", self.host)
    }

    /// REST endpoint returning the registration/profile snapshot.
    #[must_use]
    pub fn profile_url(&self) -> String {
        format!("https://{}/api/register/getregdata", self.host)
    }
}

/// Loads the application configuration from environment variables.
///
/// The host defaults to `iqoption.com` and can be overridden with
/// `OPTIC_HOST`. Both credential variables are required.
///
/// # Errors
///
/// Returns [`OpticError::Config`](crate::OpticError::Config) if either
/// credential variable is missing or `OPTIC_SETTLE_MS` is not an integer.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let host = non_empty_var("OPTIC_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

    let email = non_empty_var("OPTIC_EMAIL")
        .ok_or_else(|| crate::OpticError::Config("OPTIC_EMAIL is not set".to_string()))?;
    let password = non_empty_var("OPTIC_PASSWORD")
        .ok_or_else(|| crate::OpticError::Config("OPTIC_PASSWORD is not set".to_string()))?;

    let settle_ms = match non_empty_var("OPTIC_SETTLE_MS") {
        Some(raw) => raw.parse::<u64>().map_err(|_| {
            crate::OpticError::Config(format!("OPTIC_SETTLE_MS is not an integer: {raw}"))
        })?,
        None => DEFAULT_SETTLE_MS,
    };

    Ok(AppConfig {
        platform: PlatformConfig {
            host,
            email,
            password,
            settle: Duration::from_millis(settle_ms),
        },
    })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}
