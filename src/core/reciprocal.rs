//! Reciprocal record builder
//!
//! Derives the two ledger rows of a double-entry transfer from one validated
//! intent. Deterministic, no storage access.

use crate::types::{Direction, LedgerEntry, ValidatedTransfer};

/// Build the (outgoing, incoming) entry pair for a transfer
///
/// The outgoing row belongs to the source and points `to` the destination;
/// the incoming row belongs to the destination and points `from` the source.
/// Both carry the transfer amount.
pub fn build_entries(transfer: &ValidatedTransfer) -> (LedgerEntry, LedgerEntry) {
    let outgoing = LedgerEntry {
        account: transfer.source(),
        amount: transfer.amount(),
        direction: Direction::Outgoing,
        to_account: Some(transfer.destination()),
        from_account: None,
    };

    let incoming = LedgerEntry {
        account: transfer.destination(),
        amount: transfer.amount(),
        direction: Direction::Incoming,
        to_account: None,
        from_account: Some(transfer.source()),
    };

    (outgoing, incoming)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::validate;
    use crate::types::TransferIntent;
    use rust_decimal::Decimal;

    #[test]
    fn test_build_entries_are_reciprocal() {
        let transfer = validate(&TransferIntent::new(1, 2, Decimal::new(50, 0))).unwrap();

        let (outgoing, incoming) = build_entries(&transfer);

        assert_eq!(
            outgoing,
            LedgerEntry {
                account: 1,
                amount: Decimal::new(50, 0),
                direction: Direction::Outgoing,
                to_account: Some(2),
                from_account: None,
            }
        );
        assert_eq!(
            incoming,
            LedgerEntry {
                account: 2,
                amount: Decimal::new(50, 0),
                direction: Direction::Incoming,
                to_account: None,
                from_account: Some(1),
            }
        );
    }

    #[test]
    fn test_build_entries_cross_reference() {
        let transfer = validate(&TransferIntent::new(7, 3, Decimal::new(125, 2))).unwrap();

        let (outgoing, incoming) = build_entries(&transfer);

        assert_eq!(outgoing.counterparty(), Some(incoming.account));
        assert_eq!(incoming.counterparty(), Some(outgoing.account));
        assert_eq!(outgoing.direction.reverse(), incoming.direction);
        assert_eq!(outgoing.amount, incoming.amount);
    }
}
