//! Transfer request types
//!
//! [`TransferIntent`] is the raw (source, destination, amount) tuple a caller
//! hands to the engine. [`ValidatedTransfer`] can only be produced by
//! [`crate::core::validation::validate`], so holding one proves the static
//! checks passed.

use super::account::AccountId;
use rust_decimal::Decimal;

/// Raw transfer request, before validation
///
/// Every field is optional because callers bind it from loosely typed input
/// (CSV cells, query parameters). A party of `Some(0)` counts as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferIntent {
    /// Account to debit
    pub source: Option<AccountId>,

    /// Account to credit
    pub destination: Option<AccountId>,

    /// Amount to move, must be strictly positive
    pub amount: Option<Decimal>,
}

impl TransferIntent {
    /// Build a fully specified intent
    pub fn new(source: AccountId, destination: AccountId, amount: Decimal) -> Self {
        TransferIntent {
            source: Some(source),
            destination: Some(destination),
            amount: Some(amount),
        }
    }
}

/// A transfer intent that passed the static checks
///
/// Invariants: both parties are defined and distinct, and `amount > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedTransfer {
    source: AccountId,
    destination: AccountId,
    amount: Decimal,
}

impl ValidatedTransfer {
    pub(crate) fn new(source: AccountId, destination: AccountId, amount: Decimal) -> Self {
        ValidatedTransfer {
            source,
            destination,
            amount,
        }
    }

    pub fn source(&self) -> AccountId {
        self.source
    }

    pub fn destination(&self) -> AccountId {
        self.destination
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}
