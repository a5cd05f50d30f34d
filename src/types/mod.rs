//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account records and identifiers
//! - `payment`: Payment records, ledger entries and directions
//! - `transfer`: Transfer intents before and after validation
//! - `error`: Error types for the ledger

pub mod account;
pub mod error;
pub mod payment;
pub mod transfer;

pub use account::{Account, AccountId};
pub use error::{StorageError, TransferError, ValidationError};
pub use payment::{Direction, LedgerEntry, Payment, PaymentId};
pub use transfer::{TransferIntent, ValidatedTransfer};
