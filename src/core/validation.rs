//! Static transfer request checks
//!
//! Pure function of the intent's fields; never touches storage. Checks run in
//! a fixed order and the first failure wins:
//! 1. amount present and strictly positive
//! 2. both parties defined (non-zero)
//! 3. source differs from destination

use crate::types::{AccountId, TransferIntent, ValidatedTransfer, ValidationError};
use rust_decimal::Decimal;

/// Validate the shape of a transfer intent
///
/// # Errors
///
/// Returns an error if:
/// - The amount is missing ([`ValidationError::MissingAmount`])
/// - The amount is zero or negative ([`ValidationError::NonPositiveAmount`])
/// - The source or destination is missing or zero ([`ValidationError::MissingParty`])
/// - The source equals the destination ([`ValidationError::SameAccount`])
pub fn validate(intent: &TransferIntent) -> Result<ValidatedTransfer, ValidationError> {
    let amount = intent.amount.ok_or(ValidationError::MissingAmount)?;
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount { amount });
    }

    let source = defined_party(intent.source, "source")?;
    let destination = defined_party(intent.destination, "destination")?;

    if source == destination {
        return Err(ValidationError::SameAccount { account: source });
    }

    Ok(ValidatedTransfer::new(source, destination, amount))
}

fn defined_party(
    party: Option<AccountId>,
    role: &'static str,
) -> Result<AccountId, ValidationError> {
    match party {
        Some(id) if id != 0 => Ok(id),
        _ => Err(ValidationError::MissingParty { role }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn intent(
        source: Option<AccountId>,
        destination: Option<AccountId>,
        amount: Option<Decimal>,
    ) -> TransferIntent {
        TransferIntent {
            source,
            destination,
            amount,
        }
    }

    #[test]
    fn test_valid_intent() {
        let validated = validate(&TransferIntent::new(1, 2, Decimal::new(50, 0))).unwrap();

        assert_eq!(validated.source(), 1);
        assert_eq!(validated.destination(), 2);
        assert_eq!(validated.amount(), Decimal::new(50, 0));
    }

    #[rstest]
    #[case::missing_amount(intent(Some(1), Some(2), None), ValidationError::MissingAmount)]
    #[case::zero_amount(
        intent(Some(1), Some(2), Some(Decimal::ZERO)),
        ValidationError::NonPositiveAmount { amount: Decimal::ZERO }
    )]
    #[case::negative_amount(
        intent(Some(1), Some(2), Some(Decimal::NEGATIVE_ONE)),
        ValidationError::NonPositiveAmount { amount: Decimal::NEGATIVE_ONE }
    )]
    #[case::missing_source(
        intent(None, Some(2), Some(Decimal::ONE)),
        ValidationError::MissingParty { role: "source" }
    )]
    #[case::zero_source(
        intent(Some(0), Some(2), Some(Decimal::ONE)),
        ValidationError::MissingParty { role: "source" }
    )]
    #[case::missing_destination(
        intent(Some(1), None, Some(Decimal::ONE)),
        ValidationError::MissingParty { role: "destination" }
    )]
    #[case::both_parties_zero(
        intent(Some(0), Some(0), Some(Decimal::ONE)),
        ValidationError::MissingParty { role: "source" }
    )]
    #[case::same_account(
        intent(Some(1), Some(1), Some(Decimal::ONE)),
        ValidationError::SameAccount { account: 1 }
    )]
    fn test_rejected_intents(#[case] intent: TransferIntent, #[case] expected: ValidationError) {
        assert_eq!(validate(&intent), Err(expected));
    }

    #[test]
    fn test_amount_checked_before_parties() {
        let result = validate(&intent(None, None, None));
        assert_eq!(result, Err(ValidationError::MissingAmount));
    }

    #[test]
    fn test_fractional_amount_accepted() {
        let validated = validate(&TransferIntent::new(1, 2, Decimal::new(1, 4))).unwrap();
        assert_eq!(validated.amount(), Decimal::new(1, 4));
    }
}
