//! CSV format handling for ledger input and output
//!
//! This module centralizes all CSV format concerns, providing:
//! - Record structures for deserializing account seeds and transfer requests
//! - Conversion from CSV records to domain types
//! - Account and payment output serialization
//!
//! Conversion functions are pure (no I/O) for easy testing.

use crate::core::traits::{Datastore, Page, PaymentFilter};
use crate::types::{Account, AccountId, TransferIntent};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Account seed row: `owner,balance,currency`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AccountCsvRecord {
    pub owner: String,
    pub balance: String,
    pub currency: String,
}

/// Account to be created in the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSeed {
    pub owner: String,
    pub balance: Decimal,
    pub currency: String,
}

/// Transfer request row: `source,destination,amount`
///
/// Every column may be blank; missing values are reported by the engine's
/// validation rather than here.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TransferCsvRecord {
    pub source: Option<AccountId>,
    pub destination: Option<AccountId>,
    pub amount: Option<String>,
}

/// Convert an AccountCsvRecord to an AccountSeed
///
/// # Errors
///
/// Returns an error message if the balance is not a decimal number or the
/// currency code is blank.
pub fn convert_account_record(record: AccountCsvRecord) -> Result<AccountSeed, String> {
    let balance = Decimal::from_str(record.balance.trim()).map_err(|_| {
        format!(
            "Invalid balance '{}' for account owned by '{}'",
            record.balance, record.owner
        )
    })?;

    let currency = record.currency.trim();
    if currency.is_empty() {
        return Err(format!(
            "Missing currency for account owned by '{}'",
            record.owner
        ));
    }

    Ok(AccountSeed {
        owner: record.owner,
        balance,
        currency: currency.to_string(),
    })
}

/// Convert a TransferCsvRecord to a TransferIntent
///
/// A blank amount becomes `None`. An amount that is present but not a decimal
/// number is a conversion error.
pub fn convert_transfer_record(record: TransferCsvRecord) -> Result<TransferIntent, String> {
    let amount = match record.amount {
        Some(amount_str) if !amount_str.trim().is_empty() => {
            match Decimal::from_str(amount_str.trim()) {
                Ok(decimal) => Some(decimal),
                Err(_) => {
                    return Err(format!(
                        "Invalid amount '{}' for transfer {:?} -> {:?}",
                        amount_str, record.source, record.destination
                    ))
                }
            }
        }
        _ => None,
    };

    Ok(TransferIntent {
        source: record.source,
        destination: record.destination,
        amount,
    })
}

/// Write account states to CSV format
///
/// Writes accounts with columns: id, owner, balance, currency, sorted by id
/// for deterministic output.
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["id", "owner", "balance", "currency"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by_key(|account| account.id);

    for account in sorted_accounts {
        writer
            .write_record(&[
                account.id.to_string(),
                account.owner,
                format!("{:.4}", account.balance),
                account.currency,
            ])
            .map_err(|e| format!("Failed to write account record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write committed payments to CSV format
///
/// Pages through the store's payment listing so the whole log is never held in
/// memory at once. Columns: id, account, direction, amount, to_account,
/// from_account; an absent counterparty is written as an empty cell.
pub fn write_payments_csv<S: Datastore>(
    store: &S,
    filter: &PaymentFilter,
    output: &mut dyn Write,
) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record([
            "id",
            "account",
            "direction",
            "amount",
            "to_account",
            "from_account",
        ])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut page = Page::default();
    loop {
        let payments = store
            .payments(filter, page.offset(), page.limit())
            .map_err(|e| format!("Failed to list payments: {}", e))?;
        if payments.is_empty() {
            break;
        }

        for payment in payments {
            writer
                .write_record(&[
                    payment.id.to_string(),
                    payment.account.to_string(),
                    payment.direction.to_string(),
                    format!("{:.4}", payment.amount),
                    optional_id(payment.to_account),
                    optional_id(payment.from_account),
                ])
                .map_err(|e| format!("Failed to write payment record: {}", e))?;
        }
        page = page.next();
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

fn optional_id(id: Option<AccountId>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}
