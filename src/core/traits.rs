//! Core traits for the transactional datastore consumed by the transfer engine
//!
//! The engine never talks to a concrete store. It is handed something that
//! implements [`Datastore`], opens one [`Transaction`] per transfer, and reads
//! and writes rows through the [`AccountStore`] and [`PaymentStore`] views of
//! that transaction.

use crate::types::{Account, AccountId, LedgerEntry, Payment, PaymentId, StorageError};

/// Number of rows returned per listing page
pub const ITEMS_PER_PAGE: usize = 10;

/// Transaction-scoped access to account rows
pub trait AccountStore {
    /// Read an account by identifier
    ///
    /// Returns `Ok(None)` when no such account exists. Writes buffered earlier in
    /// the same transaction are visible.
    fn get(&mut self, id: AccountId) -> Result<Option<Account>, StorageError>;

    /// Write an account row
    ///
    /// The write only becomes visible to other transactions on commit.
    fn put(&mut self, account: Account) -> Result<(), StorageError>;
}

/// Transaction-scoped access to the append-only payment log
pub trait PaymentStore {
    /// Append a payment row, returning its store-assigned identity
    fn insert(&mut self, entry: LedgerEntry) -> Result<PaymentId, StorageError>;
}

/// An atomic unit of work against the datastore
///
/// Dropping a transaction without calling [`Transaction::commit`] rolls it back.
pub trait Transaction: AccountStore + PaymentStore {
    /// Make every write of this transaction durable, or none of them
    fn commit(self) -> Result<(), StorageError>;

    /// Discard every write of this transaction
    fn rollback(self);
}

/// Filter options for payment listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaymentFilter {
    /// Only payments owned by this account
    pub account: Option<AccountId>,
}

impl PaymentFilter {
    pub fn for_account(account: AccountId) -> Self {
        PaymentFilter {
            account: Some(account),
        }
    }

    pub fn matches(&self, payment: &Payment) -> bool {
        self.account.map_or(true, |account| payment.account == account)
    }
}

/// Page-number pagination for listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    /// Zero-based page number
    pub number: usize,
}

impl Page {
    pub fn new(number: usize) -> Self {
        Page { number }
    }

    pub fn offset(&self) -> usize {
        self.number.saturating_mul(ITEMS_PER_PAGE)
    }

    pub fn limit(&self) -> usize {
        ITEMS_PER_PAGE
    }

    pub fn next(&self) -> Self {
        Page {
            number: self.number + 1,
        }
    }
}

/// A transactional datastore holding the ledger
///
/// Implementations must give at least read-committed isolation with row-level
/// conflict detection on account rows. Shared across threads; each transfer
/// opens its own transaction.
pub trait Datastore: Send + Sync {
    /// Transaction handle type
    type Txn: Transaction;

    /// Open a new transactional scope
    fn begin(&self) -> Result<Self::Txn, StorageError>;

    /// Committed state of a single account
    fn account(&self, id: AccountId) -> Option<Account>;

    /// Committed accounts ordered by identifier
    fn accounts(&self, offset: usize, limit: usize) -> Result<Vec<Account>, StorageError>;

    /// Committed payments in insertion order
    fn payments(
        &self,
        filter: &PaymentFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Payment>, StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;
    use rstest::rstest;
    use rust_decimal::Decimal;

    #[rstest]
    #[case::first(0, 0)]
    #[case::second(1, 10)]
    #[case::tenth(9, 90)]
    fn test_page_offset(#[case] number: usize, #[case] offset: usize) {
        let page = Page::new(number);
        assert_eq!(page.offset(), offset);
        assert_eq!(page.limit(), ITEMS_PER_PAGE);
    }

    #[test]
    fn test_page_offset_saturates() {
        assert_eq!(Page::new(usize::MAX).offset(), usize::MAX);
    }

    #[rstest]
    #[case::no_filter(PaymentFilter::default(), true)]
    #[case::matching(PaymentFilter::for_account(1), true)]
    #[case::other_account(PaymentFilter::for_account(2), false)]
    fn test_payment_filter(#[case] filter: PaymentFilter, #[case] expected: bool) {
        let payment = Payment {
            id: 1,
            account: 1,
            amount: Decimal::ONE,
            direction: Direction::Outgoing,
            to_account: Some(2),
            from_account: None,
        };
        assert_eq!(filter.matches(&payment), expected);
    }
}
