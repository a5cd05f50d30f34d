//! In-memory transactional datastore
//!
//! This module provides [`MemoryLedger`], a [`Datastore`] that keeps accounts
//! and payments in process memory while still giving the transfer engine the
//! transactional guarantees it relies on.
//!
//! # Design
//!
//! Account rows live in a `DashMap` keyed by account id, each tagged with a
//! version that every committed write bumps. A [`MemoryTxn`] buffers its writes
//! and remembers the version of every account row it read. On commit it:
//!
//! 1. takes the visibility lock for write, so commits are applied one at a time
//! 2. fails with [`StorageError::Conflict`] if any row it read has since moved
//!    on (optimistic row-level conflict detection)
//! 3. enforces the `positive_balance` check constraint on every written row
//! 4. applies all buffered writes
//!
//! The committed-state read paths hold the visibility lock for read, so they
//! observe either none or all of a commit. A transaction dropped before commit
//! leaves no trace apart from consumed payment ids, like a database sequence.
//!
//! Account ids are dense (`1..next_account_id`), which lets a listing page
//! look rows up by id instead of sorting the table. The payment log keeps a
//! per-account index for filtered pages.

use crate::core::traits::{AccountStore, Datastore, PaymentFilter, PaymentStore, Transaction};
use crate::types::{Account, AccountId, LedgerEntry, Payment, PaymentId, StorageError};
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};
use tracing::{debug, trace};

/// Name of the non-negative balance check constraint
pub const POSITIVE_BALANCE: &str = "positive_balance";

const ACCOUNTS_TABLE: &str = "accounts";

/// Datastore configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Enforce `balance >= 0` on every committed account row
    ///
    /// Some backends cannot install the constraint after table creation; turning
    /// it off leaves only the engine's own balance check in place.
    pub enforce_non_negative_balance: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            enforce_non_negative_balance: true,
        }
    }
}

#[derive(Debug, Clone)]
struct VersionedRow {
    account: Account,
    version: u64,
}

/// Append-only payment rows with a per-account index
#[derive(Debug, Default)]
struct PaymentLog {
    rows: Vec<Payment>,
    by_account: HashMap<AccountId, Vec<usize>>,
}

impl PaymentLog {
    fn append(&mut self, payments: Vec<Payment>) {
        for payment in payments {
            self.by_account
                .entry(payment.account)
                .or_default()
                .push(self.rows.len());
            self.rows.push(payment);
        }
    }

    fn page(&self, filter: &PaymentFilter, offset: usize, limit: usize) -> Vec<Payment> {
        match filter.account {
            None => self
                .rows
                .get(offset..)
                .unwrap_or_default()
                .iter()
                .take(limit)
                .cloned()
                .collect(),
            Some(account) => self
                .by_account
                .get(&account)
                .and_then(|positions| positions.get(offset..))
                .unwrap_or_default()
                .iter()
                .take(limit)
                .map(|&position| self.rows[position].clone())
                .collect(),
        }
    }
}

#[derive(Debug)]
struct Tables {
    config: LedgerConfig,
    accounts: DashMap<AccountId, VersionedRow>,
    payments: RwLock<PaymentLog>,
    next_account_id: AtomicU64,
    next_payment_id: AtomicU64,
    /// Held for write while a commit or seed is applied, for read by listings
    visibility: RwLock<()>,
}

impl Tables {
    fn check_balance(&self, account: AccountId, balance: Decimal) -> Result<(), StorageError> {
        if self.config.enforce_non_negative_balance && balance < Decimal::ZERO {
            return Err(StorageError::CheckViolation {
                constraint: POSITIVE_BALANCE,
                account,
            });
        }
        Ok(())
    }

    // The guard protects no data of its own, so a poisoned lock is still usable.
    fn read_visible(&self) -> RwLockReadGuard<'_, ()> {
        self.visibility
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Committed accounts with ids in `offset + 1 ..`, at most `limit` of them
    ///
    /// Callers hold the visibility lock.
    fn account_range(&self, offset: usize, limit: usize) -> Vec<Account> {
        let first = u64::try_from(offset).unwrap_or(u64::MAX).saturating_add(1);
        let end = self.next_account_id.load(Ordering::SeqCst);

        (first..end)
            .take(limit)
            .filter_map(|id| self.accounts.get(&id).map(|row| row.account.clone()))
            .collect()
    }
}

/// Shared handle to an in-memory ledger
///
/// Cheap to clone; every clone refers to the same tables.
#[derive(Debug, Clone)]
pub struct MemoryLedger {
    tables: Arc<Tables>,
}

impl MemoryLedger {
    /// Create an empty ledger with the default configuration
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    /// Create an empty ledger with a custom configuration
    pub fn with_config(config: LedgerConfig) -> Self {
        Self {
            tables: Arc::new(Tables {
                config,
                accounts: DashMap::new(),
                payments: RwLock::new(PaymentLog::default()),
                next_account_id: AtomicU64::new(1),
                next_payment_id: AtomicU64::new(1),
                visibility: RwLock::new(()),
            }),
        }
    }

    pub fn config(&self) -> LedgerConfig {
        self.tables.config
    }

    /// Create an account and return its store-assigned identifier
    ///
    /// This is the out-of-band seeding path; the transfer engine never creates
    /// accounts. A rejected account does not consume an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::CheckViolation`] if `balance` is negative and the
    /// `positive_balance` constraint is enforced.
    pub fn create_account(
        &self,
        owner: impl Into<String>,
        balance: Decimal,
        currency: impl Into<String>,
    ) -> Result<AccountId, StorageError> {
        let tables = &self.tables;
        let _visible = tables
            .visibility
            .write()
            .map_err(|_| StorageError::Poisoned)?;

        let id = tables.next_account_id.load(Ordering::SeqCst);
        tables.check_balance(id, balance)?;

        tables.accounts.insert(
            id,
            VersionedRow {
                account: Account::new(id, owner, balance, currency),
                version: 1,
            },
        );
        tables.next_account_id.store(id + 1, Ordering::SeqCst);
        debug!(account = id, %balance, "account created");
        Ok(id)
    }

    /// All committed accounts ordered by identifier
    pub fn all_accounts(&self) -> Vec<Account> {
        let _visible = self.tables.read_visible();
        self.tables.account_range(0, usize::MAX)
    }

    /// Number of committed payment rows
    pub fn payment_count(&self) -> Result<usize, StorageError> {
        let payments = self
            .tables
            .payments
            .read()
            .map_err(|_| StorageError::Poisoned)?;
        Ok(payments.rows.len())
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Datastore for MemoryLedger {
    type Txn = MemoryTxn;

    fn begin(&self) -> Result<MemoryTxn, StorageError> {
        Ok(MemoryTxn {
            tables: Arc::clone(&self.tables),
            read_versions: HashMap::new(),
            account_writes: BTreeMap::new(),
            payment_inserts: Vec::new(),
            finished: false,
        })
    }

    fn account(&self, id: AccountId) -> Option<Account> {
        let _visible = self.tables.read_visible();
        self.tables
            .accounts
            .get(&id)
            .map(|row| row.account.clone())
    }

    fn accounts(&self, offset: usize, limit: usize) -> Result<Vec<Account>, StorageError> {
        let _visible = self
            .tables
            .visibility
            .read()
            .map_err(|_| StorageError::Poisoned)?;
        Ok(self.tables.account_range(offset, limit))
    }

    fn payments(
        &self,
        filter: &PaymentFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Payment>, StorageError> {
        let payments = self
            .tables
            .payments
            .read()
            .map_err(|_| StorageError::Poisoned)?;
        Ok(payments.page(filter, offset, limit))
    }
}

/// A transaction against a [`MemoryLedger`]
///
/// Writes are buffered until [`Transaction::commit`]. Dropping the handle
/// without committing discards them.
#[derive(Debug)]
pub struct MemoryTxn {
    tables: Arc<Tables>,
    read_versions: HashMap<AccountId, u64>,
    account_writes: BTreeMap<AccountId, Account>,
    payment_inserts: Vec<Payment>,
    finished: bool,
}

impl MemoryTxn {
    fn validate_reads(&self) -> Result<(), StorageError> {
        for (&id, &version) in &self.read_versions {
            let current = self.tables.accounts.get(&id).map(|row| row.version);
            if current != Some(version) {
                debug!(account = id, read = version, current = ?current, "write conflict");
                return Err(StorageError::Conflict {
                    table: ACCOUNTS_TABLE,
                    id,
                });
            }
        }
        Ok(())
    }
}

impl AccountStore for MemoryTxn {
    fn get(&mut self, id: AccountId) -> Result<Option<Account>, StorageError> {
        if let Some(account) = self.account_writes.get(&id) {
            return Ok(Some(account.clone()));
        }

        let Some(row) = self.tables.accounts.get(&id).map(|row| row.value().clone()) else {
            return Ok(None);
        };
        self.read_versions.entry(id).or_insert(row.version);
        Ok(Some(row.account))
    }

    fn put(&mut self, account: Account) -> Result<(), StorageError> {
        self.account_writes.insert(account.id, account);
        Ok(())
    }
}

impl PaymentStore for MemoryTxn {
    fn insert(&mut self, entry: LedgerEntry) -> Result<PaymentId, StorageError> {
        let id = self.tables.next_payment_id.fetch_add(1, Ordering::SeqCst);
        self.payment_inserts.push(Payment::from_entry(id, entry));
        Ok(id)
    }
}

impl Transaction for MemoryTxn {
    fn commit(mut self) -> Result<(), StorageError> {
        let tables = Arc::clone(&self.tables);
        let _visible = tables
            .visibility
            .write()
            .map_err(|_| StorageError::Poisoned)?;

        self.validate_reads()?;
        for account in self.account_writes.values() {
            tables.check_balance(account.id, account.balance)?;
        }

        let mut payments = tables.payments.write().map_err(|_| StorageError::Poisoned)?;

        for (id, account) in std::mem::take(&mut self.account_writes) {
            let mut row = tables.accounts.entry(id).or_insert(VersionedRow {
                account: account.clone(),
                version: 0,
            });
            row.account = account;
            row.version += 1;
        }
        payments.append(std::mem::take(&mut self.payment_inserts));

        self.finished = true;
        trace!("transaction committed");
        Ok(())
    }

    fn rollback(self) {
        // Drop discards the buffered writes.
    }
}

impl Drop for MemoryTxn {
    fn drop(&mut self) {
        if !self.finished {
            trace!(
                accounts = self.account_writes.len(),
                payments = self.payment_inserts.len(),
                "transaction rolled back"
            );
        }
    }
}
