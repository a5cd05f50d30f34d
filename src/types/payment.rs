//! Payment-related types for the payments ledger
//!
//! A committed transfer is recorded as two reciprocal payment rows, one per
//! participating account. [`LedgerEntry`] is such a row before the payment
//! store has assigned it an identity; [`Payment`] is the persisted row.

use super::account::AccountId;
use rust_decimal::Decimal;
use std::fmt;

/// Payment identifier
///
/// Assigned by the payment store on insert, starting at 1.
pub type PaymentId = u64;

/// Direction of a payment relative to its owning account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Money left the owning account; the counterparty is in `to_account`
    Outgoing,

    /// Money arrived on the owning account; the counterparty is in `from_account`
    Incoming,
}

impl Direction {
    /// The opposite direction
    pub fn reverse(self) -> Self {
        match self {
            Direction::Outgoing => Direction::Incoming,
            Direction::Incoming => Direction::Outgoing,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Outgoing => "outgoing",
            Direction::Incoming => "incoming",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payment row that has not been persisted yet
///
/// Only one of `to_account` / `from_account` is set, matching `direction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Account this row belongs to
    pub account: AccountId,

    /// Positive amount moved
    pub amount: Decimal,

    pub direction: Direction,

    /// Destination account, set for outgoing rows
    pub to_account: Option<AccountId>,

    /// Source account, set for incoming rows
    pub from_account: Option<AccountId>,
}

impl LedgerEntry {
    /// The account on the other side of this row
    pub fn counterparty(&self) -> Option<AccountId> {
        match self.direction {
            Direction::Outgoing => self.to_account,
            Direction::Incoming => self.from_account,
        }
    }
}

/// A persisted, immutable payment row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    /// Store-assigned identifier
    pub id: PaymentId,

    pub account: AccountId,
    pub amount: Decimal,
    pub direction: Direction,
    pub to_account: Option<AccountId>,
    pub from_account: Option<AccountId>,
}

impl Payment {
    /// Attach a store-assigned identity to a ledger entry
    pub fn from_entry(id: PaymentId, entry: LedgerEntry) -> Self {
        Payment {
            id,
            account: entry.account,
            amount: entry.amount,
            direction: entry.direction,
            to_account: entry.to_account,
            from_account: entry.from_account,
        }
    }

    /// The account on the other side of this payment
    pub fn counterparty(&self) -> Option<AccountId> {
        match self.direction {
            Direction::Outgoing => self.to_account,
            Direction::Incoming => self.from_account,
        }
    }
}

impl fmt::Display for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID={}, FROM={}, TO={}, Amount={}",
            self.account,
            self.from_account.unwrap_or_default(),
            self.to_account.unwrap_or_default(),
            self.amount
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::outgoing(Direction::Outgoing, Direction::Incoming, "outgoing")]
    #[case::incoming(Direction::Incoming, Direction::Outgoing, "incoming")]
    fn test_direction(#[case] direction: Direction, #[case] reversed: Direction, #[case] text: &str) {
        assert_eq!(direction.reverse(), reversed);
        assert_eq!(direction.to_string(), text);
    }

    #[test]
    fn test_payment_display_uses_zero_for_absent_counterparty() {
        let payment = Payment {
            id: 7,
            account: 1,
            amount: Decimal::new(505, 1),
            direction: Direction::Outgoing,
            to_account: Some(2),
            from_account: None,
        };

        assert_eq!(payment.to_string(), "ID=1, FROM=0, TO=2, Amount=50.5");
        assert_eq!(payment.counterparty(), Some(2));
    }

    #[test]
    fn test_from_entry_keeps_fields() {
        let entry = LedgerEntry {
            account: 2,
            amount: Decimal::TEN,
            direction: Direction::Incoming,
            to_account: None,
            from_account: Some(1),
        };

        let payment = Payment::from_entry(3, entry.clone());

        assert_eq!(payment.id, 3);
        assert_eq!(payment.account, entry.account);
        assert_eq!(payment.counterparty(), entry.counterparty());
    }
}
