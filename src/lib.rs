//! Payments Ledger Library
//! # Overview
//!
//! This library moves money between accounts of an in-memory ledger. Each
//! transfer debits one account and credits another atomically, recording a
//! pair of reciprocal payment entries alongside the balance changes.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Payment, TransferIntent, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`logging`] - tracing subscriber setup
//! - [`core`] - Business logic components:
//!   - [`core::validation`] - Request validation
//!   - [`core::reciprocal`] - Outgoing/incoming payment pair construction
//!   - [`core::engine`] - Transactional transfer orchestration
//!   - [`core::ledger`] - In-memory transactional datastore
//!   - [`core::batch_processor`] - Concurrent execution with conflict retries
//! - [`io`] - CSV input and output
//! - [`strategy`] - Sequential and concurrent file processing
//!
//! # Transfer Lifecycle
//!
//! 1. The request is validated (positive amount, two distinct parties)
//! 2. A datastore transaction is opened
//! 3. Source and destination accounts are loaded
//! 4. Currencies must match and the source must cover the amount
//! 5. Both balances are updated and two payment rows are inserted
//! 6. The transaction commits; any failure before that rolls everything back
//!
//! # Invariants
//!
//! - The sum of all balances per currency never changes
//! - No committed balance is ever negative
//! - Every committed transfer leaves exactly one outgoing and one incoming
//!   payment with the same amount

pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use crate::core::{Datastore, MemoryLedger, TransferEngine};
pub use crate::io::{write_accounts_csv, write_payments_csv};
pub use crate::types::{
    Account, AccountId, Direction, Payment, PaymentId, TransferError, TransferIntent,
};
