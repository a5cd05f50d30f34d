//! Account-related types for the payments ledger
//!
//! This module defines the Account structure held by the ledger's account store.

use rust_decimal::Decimal;

/// Account identifier
///
/// Assigned by the store on creation, starting at 1. The value `0` is never
/// assigned and is treated as "undefined" by request validation.
pub type AccountId = u64;

/// A monetary account
///
/// Accounts are created out-of-band (seeding/administration) and afterwards
/// only the transfer engine writes their balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Store-assigned identifier
    pub id: AccountId,

    /// Free-text owner name
    pub owner: String,

    /// Current balance
    ///
    /// Signed so that a broken write can be represented and rejected, but every
    /// committed read observes `balance >= 0`.
    pub balance: Decimal,

    /// Currency code (e.g. `USD`)
    ///
    /// Transfers are only allowed between accounts with the same code.
    pub currency: String,
}

impl Account {
    /// Create an account value with the given identity and opening state
    pub fn new(id: AccountId, owner: impl Into<String>, balance: Decimal, currency: impl Into<String>) -> Self {
        Account {
            id,
            owner: owner.into(),
            balance,
            currency: currency.into(),
        }
    }

    /// Whether this account can transact with `other` (same currency code)
    pub fn same_currency(&self, other: &Account) -> bool {
        self.currency == other.currency
    }
}
