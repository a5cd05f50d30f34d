//! Core business logic module
//!
//! This module contains the transfer engine and the collaborators it is wired to:
//! - `traits` - Datastore, transaction and store abstractions consumed by the engine
//! - `validation` - Static transfer request checks
//! - `reciprocal` - Derivation of the paired outgoing/incoming ledger entries
//! - `engine` - Atomic transfer execution
//! - `ledger` - In-memory transactional datastore
//! - `batch_processor` - Concurrent caller with a conflict retry policy

pub mod batch_processor;
pub mod engine;
pub mod ledger;
pub mod reciprocal;
pub mod traits;
pub mod validation;

pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use engine::{TransferEngine, TransferStage};
pub use ledger::{LedgerConfig, MemoryLedger, MemoryTxn};
pub use traits::{AccountStore, Datastore, Page, PaymentFilter, PaymentStore, Transaction};
