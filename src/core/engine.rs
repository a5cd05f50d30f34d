//! Transfer engine
//!
//! This module provides the [`TransferEngine`] that validates, executes and
//! durably records a double-entry money movement between two accounts.
//!
//! Every transfer runs inside exactly one transactional scope:
//!
//! ```text
//! Received → Validated → AccountsLoaded → BalancesChecked → Applied → Persisted → Committed
//!     └──────────────┴──────────────┴──────────────┴──────────┴───────────┴──→ Aborted(reason)
//! ```
//!
//! Any failure drops the open transaction, which rolls it back, so no
//! intermediate stage is ever observable. The engine holds no locks and caches
//! no account state; consistency is delegated entirely to the datastore.

use crate::core::reciprocal::build_entries;
use crate::core::traits::{AccountStore, Datastore, PaymentStore, Transaction};
use crate::core::validation::validate;
use crate::types::{Account, AccountId, TransferError, TransferIntent, ValidatedTransfer};
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Stage of a single transfer execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStage {
    Received,
    Validated,
    AccountsLoaded,
    BalancesChecked,
    Applied,
    Persisted,
    Committed,
}

impl fmt::Display for TransferStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransferStage::Received => "received",
            TransferStage::Validated => "validated",
            TransferStage::AccountsLoaded => "accounts_loaded",
            TransferStage::BalancesChecked => "balances_checked",
            TransferStage::Applied => "applied",
            TransferStage::Persisted => "persisted",
            TransferStage::Committed => "committed",
        };
        f.write_str(name)
    }
}

/// A transfer that stopped before committing
#[derive(Debug, PartialEq)]
struct Aborted {
    /// Last stage completed before the failure
    stage: TransferStage,
    error: TransferError,
}

/// Transfer processing engine
///
/// Generic over the datastore it is handed at construction; it never reaches
/// for a global handle. Cheap to clone and safe to share across threads, each
/// call opens its own transaction.
#[derive(Debug)]
pub struct TransferEngine<S> {
    store: Arc<S>,
}

impl<S> Clone for TransferEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: Datastore> TransferEngine<S> {
    /// Create a new TransferEngine over the given datastore
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The datastore this engine writes to
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Move `amount` from `source` to `destination`
    ///
    /// Entry point for calling shells (HTTP handlers, CSV pipelines). See
    /// [`TransferEngine::execute`] for the guarantees.
    pub fn submit_transfer(
        &self,
        source: AccountId,
        destination: AccountId,
        amount: Decimal,
    ) -> Result<(), TransferError> {
        self.execute(&TransferIntent::new(source, destination, amount))
    }

    /// Validate and execute a transfer intent atomically
    ///
    /// On success both account balances are updated and the reciprocal payment
    /// pair is recorded. On any failure nothing is persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The intent is malformed ([`TransferError::InvalidRequest`])
    /// - Source equals destination ([`TransferError::SameAccount`]), detected before any storage access
    /// - Either account does not exist ([`TransferError::UnknownAccount`])
    /// - The accounts use different currencies ([`TransferError::CurrencyMismatch`])
    /// - The source balance is below the amount ([`TransferError::InsufficientFunds`])
    /// - Persisting or committing fails ([`TransferError::StorageFailure`]), including
    ///   a lost race against a concurrent transfer on the same account
    pub fn execute(&self, intent: &TransferIntent) -> Result<(), TransferError> {
        match self.attempt(intent) {
            Ok(()) => {
                info!(
                    source = ?intent.source,
                    destination = ?intent.destination,
                    amount = ?intent.amount,
                    "transfer committed"
                );
                Ok(())
            }
            Err(Aborted { stage, error }) => {
                warn!(
                    source = ?intent.source,
                    destination = ?intent.destination,
                    amount = ?intent.amount,
                    %stage,
                    kind = error.kind(),
                    "transfer aborted: {}",
                    error
                );
                Err(error)
            }
        }
    }

    /// Run the state machine, reporting the last stage reached on failure
    fn attempt(&self, intent: &TransferIntent) -> Result<(), Aborted> {
        let mut stage = TransferStage::Received;

        let result = validate(intent)
            .map_err(TransferError::from)
            .and_then(|transfer| {
                stage = TransferStage::Validated;
                self.apply(&transfer, &mut stage)
            });

        result.map_err(|error| Aborted { stage, error })
    }

    fn apply(
        &self,
        transfer: &ValidatedTransfer,
        stage: &mut TransferStage,
    ) -> Result<(), TransferError> {
        let mut txn = self.store.begin()?;

        let mut source = load(&mut txn, transfer.source())?;
        let mut destination = load(&mut txn, transfer.destination())?;
        *stage = TransferStage::AccountsLoaded;

        check_balances(&source, &destination, transfer.amount())?;
        *stage = TransferStage::BalancesChecked;

        source.balance -= transfer.amount();
        destination.balance += transfer.amount();
        let (outgoing, incoming) = build_entries(transfer);
        *stage = TransferStage::Applied;

        txn.put(source)?;
        txn.put(destination)?;
        let outgoing_id = txn.insert(outgoing)?;
        let incoming_id = txn.insert(incoming)?;
        *stage = TransferStage::Persisted;
        debug!(outgoing_id, incoming_id, "payments recorded");

        // The store may still refuse here, e.g. a concurrent debit won the race.
        txn.commit()?;
        *stage = TransferStage::Committed;

        Ok(())
    }
}

fn load<T: AccountStore>(txn: &mut T, id: AccountId) -> Result<Account, TransferError> {
    txn.get(id)?
        .ok_or_else(|| TransferError::unknown_account(id))
}

/// Dynamic business rules, re-checked against freshly read rows
fn check_balances(
    source: &Account,
    destination: &Account,
    amount: Decimal,
) -> Result<(), TransferError> {
    if !source.same_currency(destination) {
        return Err(TransferError::currency_mismatch(
            &source.currency,
            &destination.currency,
        ));
    }

    if source.balance < amount {
        return Err(TransferError::insufficient_funds(
            source.id,
            source.balance,
            amount,
        ));
    }

    Ok(())
}
