//! Error types for the payments ledger
//!
//! This module defines all error types that can occur while validating and
//! executing a transfer. Every error is recoverable and user-facing; none of
//! them is fatal to the process.
//!
//! # Error Categories
//!
//! - **Validation Errors**: static request-shape checks ([`ValidationError`])
//! - **Storage Errors**: the transactional scope failed to persist or commit ([`StorageError`])
//! - **Transfer Errors**: the taxonomy surfaced to callers ([`TransferError`])

use crate::types::AccountId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Failure of a static transfer request check
///
/// Produced without touching storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No amount was supplied
    #[error("amount is required")]
    MissingAmount,

    /// The amount is zero or negative
    #[error("amount must be positive, got {amount}")]
    NonPositiveAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// The source or destination is absent or zero
    #[error("{role} account is required")]
    MissingParty {
        /// Which side is missing (`source` or `destination`)
        role: &'static str,
    },

    /// Source and destination are the same account
    #[error("source and destination accounts are the same ({account})")]
    SameAccount {
        /// The account used on both sides
        account: AccountId,
    },
}

/// Failure reported by the transactional datastore
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// A row read by the transaction was changed by a concurrent commit
    ///
    /// The whole transaction was rolled back; retrying it may succeed.
    #[error("write conflict on {table} row {id}")]
    Conflict {
        /// Table holding the row
        table: &'static str,
        /// Identifier of the conflicting row
        id: u64,
    },

    /// A write broke a storage-level check constraint
    #[error("check constraint '{constraint}' violated by account {account}")]
    CheckViolation {
        /// Name of the constraint
        constraint: &'static str,
        /// Account whose row was rejected
        account: AccountId,
    },

    /// The store's internal lock was poisoned by a panicking writer
    #[error("datastore lock poisoned")]
    Poisoned,
}

/// Main error type for transfers
///
/// Each variant carries enough context to report the failure to a caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// Malformed or incomplete transfer intent
    #[error("invalid request: {reason}")]
    InvalidRequest {
        /// Why the request was rejected
        reason: String,
    },

    /// Source equals destination
    #[error("source and destination accounts are the same ({account})")]
    SameAccount {
        /// The account used on both sides
        account: AccountId,
    },

    /// Referenced account does not exist
    #[error("no account with ID={account}")]
    UnknownAccount {
        /// The missing account identifier
        account: AccountId,
    },

    /// The two accounts use different currency codes
    #[error("different currencies: {source_currency} vs {destination_currency}")]
    CurrencyMismatch {
        /// Currency of the source account
        source_currency: String,
        /// Currency of the destination account
        destination_currency: String,
    },

    /// Source balance is below the requested amount
    #[error("insufficient funds on account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Source account
        account: AccountId,
        /// Balance observed at check time
        balance: Decimal,
        /// Amount requested
        requested: Decimal,
    },

    /// The transactional scope failed to persist or commit
    #[error("storage failure: {0}")]
    StorageFailure(#[from] StorageError),
}

impl From<ValidationError> for TransferError {
    fn from(error: ValidationError) -> Self {
        match error {
            ValidationError::SameAccount { account } => TransferError::SameAccount { account },
            other => TransferError::InvalidRequest {
                reason: other.to_string(),
            },
        }
    }
}

// Helper functions for creating common errors

impl TransferError {
    /// Create an UnknownAccount error
    pub fn unknown_account(account: AccountId) -> Self {
        TransferError::UnknownAccount { account }
    }

    /// Create a CurrencyMismatch error
    pub fn currency_mismatch(source_currency: &str, destination_currency: &str) -> Self {
        TransferError::CurrencyMismatch {
            source_currency: source_currency.to_string(),
            destination_currency: destination_currency.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: AccountId, balance: Decimal, requested: Decimal) -> Self {
        TransferError::InsufficientFunds {
            account,
            balance,
            requested,
        }
    }

    /// Whether the caller may reasonably retry the same transfer
    ///
    /// Only write conflicts qualify: the transfer lost a race against another
    /// commit and was rolled back in full. The engine never retries by itself.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransferError::StorageFailure(StorageError::Conflict { .. })
        )
    }

    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            TransferError::InvalidRequest { .. } => "invalid_request",
            TransferError::SameAccount { .. } => "same_account",
            TransferError::UnknownAccount { .. } => "unknown_account",
            TransferError::CurrencyMismatch { .. } => "currency_mismatch",
            TransferError::InsufficientFunds { .. } => "insufficient_funds",
            TransferError::StorageFailure(_) => "storage_failure",
        }
    }
}
