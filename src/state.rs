//! In-memory synchronized view of the platform's pushed state.
//!
//! [`StateStore`] owns one typed table per message family. All mutation
//! happens through the `apply_*` methods, which the dispatch router calls
//! from the single reader task; each apply takes the write lock exactly
//! once so readers never observe a partially-applied message. Read
//! accessors clone out of the store under the read lock and may be called
//! from any task.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::candle::{Candle, CandleHistory, CandleUpdate};
use crate::models::chart::ChartTick;
use crate::models::expiration::{ExpirationEntry, ExpirationListMessage};
use crate::models::instrument::{Instrument, InstrumentsMessage, TopAssetsMessage};
use crate::models::position::{Position, PositionUpdate};
use crate::models::profile::{AccountProfile, ProfileUpdate};
use crate::models::{AccountKind, Category, actives};

#[derive(Debug, Default)]
struct StateInner {
    /// Server clock in epoch seconds, from `timeSync`.
    server_time: Option<i64>,
    profile: Option<AccountProfile>,
    positions: HashMap<u64, Position>,
    instruments: HashMap<Category, BTreeMap<u32, Instrument>>,
    top_assets: HashMap<Category, BTreeSet<u32>>,
    /// Per-underlying future expiration windows, times in seconds.
    expirations: HashMap<String, Vec<ExpirationEntry>>,
    /// Per-market historical series from `candles` responses.
    candle_history: HashMap<String, Vec<Candle>>,
    /// Per-market latest live bar from `candle-generated`.
    live_candles: HashMap<String, CandleUpdate>,
    /// symbol → time → tick, append-only.
    chart_data: HashMap<String, BTreeMap<i64, ChartTick>>,
    /// Market whose historical fetch is awaiting its `candles` response.
    pending_fetch: Option<String>,
}

/// Typed tables reconstructed from the inbound message stream.
#[derive(Debug, Default)]
pub struct StateStore {
    inner: RwLock<StateInner>,
}

impl StateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, StateInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StateInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seeds (or replaces) the account profile from an HTTPS snapshot.
    pub fn set_profile(&self, profile: AccountProfile) {
        self.write().profile = Some(profile);
    }

    /// `timeSync`: overwrite the server clock, milliseconds → seconds.
    pub(crate) fn apply_time_sync(&self, ms: f64) {
        self.write().server_time = Some((ms / 1000.0).floor() as i64);
    }

    /// `profile`: overwrite one account's balance and the active-account
    /// marker. Updates lacking `balance` or `balance_id` are liveness
    /// noise and ignored; an unknown `balance_id` is a consistency
    /// violation and leaves the store untouched.
    pub(crate) fn apply_profile(&self, update: ProfileUpdate) -> crate::Result<()> {
        let (Some(balance), Some(balance_id)) = (update.balance, update.balance_id) else {
            debug!("profile update without balance fields, ignoring");
            return Ok(());
        };

        let mut inner = self.write();
        let profile = inner
            .profile
            .as_mut()
            .ok_or(crate::OpticError::UnknownAccount(balance_id))?;
        let kind = profile
            .kind_for_id(balance_id)
            .ok_or(crate::OpticError::UnknownAccount(balance_id))?;

        if let Some(account) = profile.account_mut(kind) {
            account.balance = balance;
        }
        if let Some(currency) = update.currency {
            profile.currency = currency;
        }
        profile.active = kind;
        profile.group_code = kind.group_code();
        Ok(())
    }

    /// `position-changed`: merge-by-id, overwriting only present fields.
    pub(crate) fn apply_position_changed(&self, update: PositionUpdate) {
        let mut inner = self.write();
        match inner.positions.entry(update.id) {
            std::collections::hash_map::Entry::Occupied(mut entry) => {
                entry.get_mut().merge(update);
            }
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(Position::from(update));
            }
        }
    }

    /// `listInfoData`: wholesale replacement per element, unlike the
    /// field-merge of `position-changed`.
    pub(crate) fn apply_position_list(&self, updates: Vec<PositionUpdate>) {
        let mut inner = self.write();
        for update in updates {
            inner.positions.insert(update.id, Position::from(update));
        }
    }

    /// `newChartData`: append under the symbol, creating its series if
    /// absent. Never replaced wholesale.
    pub(crate) fn apply_chart_data(&self, tick: ChartTick) {
        let mut inner = self.write();
        inner
            .chart_data
            .entry(tick.symbol.clone())
            .or_default()
            .insert(tick.time, tick);
    }

    /// `top-assets`: full replace of the category's set.
    pub(crate) fn apply_top_assets(&self, message: TopAssetsMessage) {
        let assets: BTreeSet<u32> = message.data.iter().map(|a| a.active_id).collect();
        self.write().top_assets.insert(message.instrument_type, assets);
    }

    /// `instruments`: full replace of the category's table.
    pub(crate) fn apply_instruments(&self, message: InstrumentsMessage) {
        let table: BTreeMap<u32, Instrument> = message
            .instruments
            .into_iter()
            .map(|instrument| (instrument.id, instrument))
            .collect();
        self.write().instruments.insert(message.category, table);
    }

    /// `candle-generated`: overwrite the market's latest live bar.
    pub(crate) fn apply_candle_generated(&self, update: CandleUpdate) -> crate::Result<()> {
        let market = actives::instrument_name(update.active_id)
            .ok_or_else(|| crate::OpticError::UnknownInstrument(update.active_id.to_string()))?;
        self.write().live_candles.insert(market.to_string(), update);
        Ok(())
    }

    /// `expiration-list`: normalize entry times from milliseconds to
    /// seconds and replace the underlying's list with the entries still
    /// in the future relative to the server clock.
    pub(crate) fn apply_expiration_list(&self, message: ExpirationListMessage) {
        let mut inner = self.write();
        let clock = inner.server_time.unwrap_or(0);
        let entries: Vec<ExpirationEntry> = message
            .expiration
            .into_iter()
            .map(|entry| ExpirationEntry {
                time: entry.time / 1000,
                kind: entry.kind,
            })
            .filter(|entry| entry.time > clock)
            .collect();
        inner.expirations.insert(message.underlying, entries);
    }

    /// `candles`: complete the pending historical fetch. A non-empty list
    /// replaces that market's series; an empty list leaves the previous
    /// series untouched. A response with no fetch pending is dropped.
    pub(crate) fn apply_candle_history(&self, message: CandleHistory) {
        let mut inner = self.write();
        let Some(market) = inner.pending_fetch.take() else {
            warn!("candles response with no fetch pending, dropping");
            return;
        };
        if message.candles.is_empty() {
            debug!(market = %market, "empty candles response, keeping previous series");
            return;
        }
        inner.candle_history.insert(market, message.candles);
    }

    /// Records the market a historical fetch is about to be sent for.
    /// Fetches are serialized: a second call while one is pending fails
    /// with [`FetchPending`](crate::OpticError::FetchPending).
    pub(crate) fn begin_candle_fetch(&self, market: &str) -> crate::Result<()> {
        let mut inner = self.write();
        if let Some(pending) = &inner.pending_fetch {
            return Err(crate::OpticError::FetchPending(pending.clone()));
        }
        inner.pending_fetch = Some(market.to_string());
        Ok(())
    }

    /// Clears the fetch guard after a send failure.
    pub(crate) fn clear_candle_fetch(&self) {
        self.write().pending_fetch = None;
    }

    // ---- read accessors ----

    /// Last known server clock, epoch seconds.
    #[must_use]
    pub fn server_time(&self) -> Option<i64> {
        self.read().server_time
    }

    #[must_use]
    pub fn profile(&self) -> Option<AccountProfile> {
        self.read().profile.clone()
    }

    #[must_use]
    pub fn active_account(&self) -> Option<AccountKind> {
        self.read().profile.as_ref().map(|p| p.active)
    }

    #[must_use]
    pub fn balance(&self, kind: AccountKind) -> Option<Decimal> {
        self.read().profile.as_ref().and_then(|p| p.balance(kind))
    }

    #[must_use]
    pub fn position(&self, id: u64) -> Option<Position> {
        self.read().positions.get(&id).cloned()
    }

    #[must_use]
    pub fn positions(&self) -> Vec<Position> {
        self.read().positions.values().cloned().collect()
    }

    #[must_use]
    pub fn instruments(&self, category: Category) -> BTreeMap<u32, Instrument> {
        self.read().instruments.get(&category).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn top_assets(&self, category: Category) -> BTreeSet<u32> {
        self.read().top_assets.get(&category).cloned().unwrap_or_default()
    }

    /// Future expiration windows for an underlying, epoch seconds.
    /// Entries may go stale after storage; staleness is not purged here.
    #[must_use]
    pub fn expirations(&self, underlying: &str) -> Vec<ExpirationEntry> {
        self.read().expirations.get(underlying).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn candles(&self, market: &str) -> Vec<Candle> {
        self.read().candle_history.get(market).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn live_candle(&self, market: &str) -> Option<CandleUpdate> {
        self.read().live_candles.get(market).cloned()
    }

    #[must_use]
    pub fn chart_data(&self, symbol: &str) -> BTreeMap<i64, ChartTick> {
        self.read().chart_data.get(symbol).cloned().unwrap_or_default()
    }
}
