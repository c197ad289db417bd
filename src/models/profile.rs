//! Account profile models.
//!
//! The profile snapshot fetched over HTTPS seeds the session's account
//! mapping; `profile` pushes on the WebSocket then keep balances and the
//! active-account marker current.

use rust_decimal::Decimal;
use serde::Deserialize;

/// The two account kinds a session can trade on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Real,
    Practice,
}

impl AccountKind {
    /// Returns the lowercase name used on the wire and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            AccountKind::Real => "real",
            AccountKind::Practice => "practice",
        }
    }

    /// Internal group/tier code the platform associates with each kind.
    /// Fixed assignment, not configurable.
    pub fn group_code(self) -> u8 {
        match self {
            AccountKind::Real => 1,
            AccountKind::Practice => 4,
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Balance and identifier for one account.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccountBalance {
    pub id: u64,
    pub balance: Decimal,
}

/// The session's account table: one entry per kind, the active-account
/// marker, and the platform group code. Created once after login; mutated
/// by every `profile` push; never destroyed during a session.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountProfile {
    pub currency: String,
    pub real: Option<AccountBalance>,
    pub practice: Option<AccountBalance>,
    pub active: AccountKind,
    pub group_code: u8,
}

impl AccountProfile {
    /// Resolves a balance id to the account kind it belongs to.
    #[must_use]
    pub fn kind_for_id(&self, id: u64) -> Option<AccountKind> {
        if self.real.is_some_and(|a| a.id == id) {
            Some(AccountKind::Real)
        } else if self.practice.is_some_and(|a| a.id == id) {
            Some(AccountKind::Practice)
        } else {
            None
        }
    }

    /// Returns the account entry for a kind, if the profile has one.
    #[must_use]
    pub fn account(&self, kind: AccountKind) -> Option<AccountBalance> {
        match kind {
            AccountKind::Real => self.real,
            AccountKind::Practice => self.practice,
        }
    }

    /// Returns the balance id for a kind, if the profile has one.
    #[must_use]
    pub fn balance_id(&self, kind: AccountKind) -> Option<u64> {
        self.account(kind).map(|a| a.id)
    }

    /// Returns the balance for a kind, if the profile has one.
    #[must_use]
    pub fn balance(&self, kind: AccountKind) -> Option<Decimal> {
        self.account(kind).map(|a| a.balance)
    }

    pub(crate) fn account_mut(&mut self, kind: AccountKind) -> Option<&mut AccountBalance> {
        match kind {
            AccountKind::Real => self.real.as_mut(),
            AccountKind::Practice => self.practice.as_mut(),
        }
    }
}

/// A `profile` push. Only updates carrying both `balance` and `balance_id`
/// mutate account state; `currency` is applied when present.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub balance: Option<Decimal>,
    #[serde(default)]
    pub balance_id: Option<u64>,
    #[serde(default)]
    pub currency: Option<String>,
}
