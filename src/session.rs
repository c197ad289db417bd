//! The public session facade.
//!
//! [`Session`] owns everything a logged-in client needs: the account
//! profile seeded over HTTPS, the shared [`StateStore`], the standing
//! subscription set, and the background [`ConnectionManager`] task.
//! Outbound operations are fire-and-forget envelope sends serialized
//! through a single shared writer; outcomes are observed later through
//! the state store as the matching pushes arrive.

use std::sync::Arc;

use futures_util::SinkExt;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::info;
use tungstenite::Message;

use crate::auth;
use crate::config::{AppConfig, PlatformConfig};
use crate::models::position::Direction;
use crate::models::trade::{CandleHistoryRequest, OpenPositionRequest, OptionType};
use crate::models::{AccountKind, actives};
use crate::state::StateStore;
use crate::websocket::connection::ConnectionManager;
use crate::websocket::{Subscription, SubscriptionSet, WsWriter, trading};
use crate::{OpticError, Result};

/// A logged-in client session.
pub struct Session {
    platform: PlatformConfig,
    http: reqwest::Client,
    ssid: String,
    state: Arc<StateStore>,
    writer: Arc<Mutex<Option<WsWriter>>>,
    subscriptions: Arc<Mutex<SubscriptionSet>>,
    shutdown: watch::Sender<bool>,
    manager: JoinHandle<()>,
}

impl Session {
    /// Authenticates and starts the realtime connection.
    ///
    /// Performs the HTTPS login and profile fetch, seeds the state store,
    /// and spawns the connection manager, which establishes the WebSocket
    /// and bootstrap subscriptions in the background.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::Auth`] if the platform rejects the
    /// credentials, or an HTTP/parse error if either exchange fails.
    pub async fn login(config: AppConfig) -> Result<Self> {
        let platform = config.platform;
        let http = reqwest::Client::builder().build()?;

        let ssid = auth::login(&http, &platform).await?;
        let profile = auth::fetch_profile(&http, &platform, &ssid).await?;

        let state = Arc::new(StateStore::new());
        state.set_profile(profile);

        let writer: Arc<Mutex<Option<WsWriter>>> = Arc::new(Mutex::new(None));
        let subscriptions = Arc::new(Mutex::new(SubscriptionSet::new()));
        let (shutdown, shutdown_rx) = watch::channel(false);

        let manager = ConnectionManager::new(
            platform.websocket_url(),
            ssid.clone(),
            platform.settle,
            Arc::clone(&state),
            Arc::clone(&writer),
            Arc::clone(&subscriptions),
            shutdown_rx,
        );
        let manager = tokio::spawn(manager.run());

        Ok(Self {
            platform,
            http,
            ssid,
            state,
            writer,
            subscriptions,
            shutdown,
            manager,
        })
    }

    /// The synchronized state reconstructed from server pushes.
    #[must_use]
    pub fn state(&self) -> &StateStore {
        &self.state
    }

    /// Switches the active account, then refreshes the profile snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::UnknownAccountKind`] if the profile has no
    /// entry for `kind` (account state is left unmodified and nothing is
    /// sent), or [`OpticError::NotConnected`] while the feed is down.
    pub async fn change_account(&self, kind: AccountKind) -> Result<AccountKind> {
        let profile = self
            .state
            .profile()
            .ok_or(OpticError::UnknownAccountKind(kind))?;
        let balance_id = profile
            .balance_id(kind)
            .ok_or(OpticError::UnknownAccountKind(kind))?;

        {
            let mut guard = self.writer.lock().await;
            let write = guard.as_mut().ok_or(OpticError::NotConnected)?;
            trading::change_balance(write, balance_id).await?;
        }

        let refreshed = auth::fetch_profile(&self.http, &self.platform, &self.ssid).await?;
        self.state.set_profile(refreshed);
        info!(kind = %kind, "switched active account");

        self.state
            .active_account()
            .ok_or(OpticError::UnknownAccountKind(kind))
    }

    /// Subscribes to a market's quote and candle streams and refreshes its
    /// digital-option expiration windows.
    ///
    /// The subscriptions become standing: they are recorded before any
    /// send, so they survive (and are replayed after) every reconnect.
    /// While the feed is down the send is skipped; replay covers it.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::UnknownInstrument`] if the market name is not
    /// in the actives table, or a send error if the feed drops mid-send.
    pub async fn subscribe_market(&self, market: &str, candle_size: u32) -> Result<()> {
        let active_id = actives::active_id(market)
            .ok_or_else(|| OpticError::UnknownInstrument(market.to_string()))?;

        let wanted = [
            Subscription::Quotes { active_id },
            Subscription::Candles {
                active_id,
                size: candle_size,
            },
            Subscription::Expirations {
                underlying: market.to_string(),
            },
        ];

        let mut subscriptions = self.subscriptions.lock().await;
        let added: Vec<Subscription> = wanted
            .into_iter()
            .filter(|subscription| subscriptions.add(subscription.clone()))
            .collect();

        let mut guard = self.writer.lock().await;
        if let Some(write) = guard.as_mut() {
            for subscription in &added {
                let frame = subscription.message()?;
                write.send(Message::Text(frame.into())).await?;
            }
        }
        info!(market, candle_size, added = added.len(), "market subscribed");

        Ok(())
    }

    /// Places a position. Fire-and-forget: the confirmation arrives later
    /// as a `position-changed` push keyed by the server-assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::UnknownInstrument`] for an unknown market,
    /// [`OpticError::UnknownAccountKind`] if the active account has no
    /// balance entry, or [`OpticError::NotConnected`] before the first
    /// `timeSync` (the buy payload requires the server clock) or while
    /// the feed is down.
    pub async fn open_position(
        &self,
        market: &str,
        price: Decimal,
        direction: Direction,
        option_type: OptionType,
        expiration_time: i64,
    ) -> Result<()> {
        let act = actives::active_id(market)
            .ok_or_else(|| OpticError::UnknownInstrument(market.to_string()))?;
        let profile = self.state.profile().ok_or(OpticError::NotConnected)?;
        let balance_id = profile
            .balance_id(profile.active)
            .ok_or(OpticError::UnknownAccountKind(profile.active))?;
        let time = self.state.server_time().ok_or(OpticError::NotConnected)?;

        let request = OpenPositionRequest::new(
            balance_id,
            price,
            direction,
            time,
            expiration_time,
            act,
            option_type,
        );

        let mut guard = self.writer.lock().await;
        let write = guard.as_mut().ok_or(OpticError::NotConnected)?;
        trading::open_position(write, &request).await
    }

    /// Requests a historical candle range, counted back from the last live
    /// candle's server-assigned id.
    ///
    /// Requires a prior candle subscription for the market (a live candle
    /// must have arrived). Fetches are serialized one at a time; the
    /// response lands in the state store's series for this market.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::NotSubscribed`] if no live candle exists for
    /// the market (nothing is sent), [`OpticError::FetchPending`] if
    /// another fetch is in flight, or [`OpticError::MalformedMessage`]
    /// for a non-positive interval.
    pub async fn fetch_candles(
        &self,
        market: &str,
        interval_seconds: u32,
        start_time: i64,
        end_time: i64,
    ) -> Result<()> {
        let active_id = actives::active_id(market)
            .ok_or_else(|| OpticError::UnknownInstrument(market.to_string()))?;
        if interval_seconds == 0 {
            return Err(OpticError::MalformedMessage(
                "candle interval must be positive".to_string(),
            ));
        }
        let latest = self
            .state
            .live_candle(market)
            .ok_or_else(|| OpticError::NotSubscribed(market.to_string()))?;

        self.state.begin_candle_fetch(market)?;

        let span = (end_time - start_time) / i64::from(interval_seconds);
        let from_id = i64::try_from(latest.id)
            .unwrap_or(i64::MAX)
            .saturating_sub(span)
            .max(0);
        let from_id = u64::try_from(from_id).unwrap_or(0);
        let request = CandleHistoryRequest {
            active_id,
            size: interval_seconds,
            from_id,
            to_id: latest.id,
            only_closed: true,
        };

        let result = {
            let mut guard = self.writer.lock().await;
            match guard.as_mut() {
                Some(write) => trading::request_candle_history(write, &request).await,
                None => Err(OpticError::NotConnected),
            }
        };
        if result.is_err() {
            self.state.clear_candle_fetch();
        }
        result
    }

    /// Stops the connection manager and closes the connection.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.manager.await;
        info!("session shut down");
    }
}
