//! Synchronous CSV readers
//!
//! Provides a streaming iterator over transfer requests from a CSV file and a
//! loader for the account seed file. Delegates CSV format concerns to the
//! csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding
//! `Result<TransferIntent, String>` for each CSV row:
//!
//! ```no_run
//! use payments_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("transfers.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(intent) => println!("Transfer: {:?}", intent),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual record parsing errors are yielded as Err variants in the iterator
//! - Line numbers are included in error messages for debugging

use crate::core::ledger::MemoryLedger;
use crate::io::csv_format::{
    convert_account_record, convert_transfer_record, AccountCsvRecord, TransferCsvRecord,
};
use crate::types::{AccountId, TransferIntent};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;
use tracing::info;

fn open_csv(path: &Path) -> Result<csv::Reader<File>, String> {
    let file = File::open(path)
        .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

    Ok(ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .buffer_capacity(8 * 1024)
        .from_reader(file))
}

/// Synchronous transfer request reader
///
/// Streams rows one at a time with constant memory usage.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: usize,
}

impl SyncReader {
    /// Create a new SyncReader from a file path
    ///
    /// The CSV reader trims whitespace from all fields and allows flexible field
    /// counts (a trailing blank amount may be omitted).
    pub fn new(path: &Path) -> Result<Self, String> {
        Ok(Self {
            reader: open_csv(path)?,
            line_num: 0,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<TransferIntent, String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<TransferCsvRecord>();

        let item = match deserializer.next()? {
            Ok(record) => {
                self.line_num += 1;
                convert_transfer_record(record)
                    .map_err(|e| format!("Line {}: {}", self.line_num + 1, e))
            }
            Err(e) => {
                self.line_num += 1;
                Err(format!("CSV parse error at line {}: {}", self.line_num + 1, e))
            }
        };
        Some(item)
    }
}

/// Create every account listed in a seed CSV file
///
/// Accounts are created in row order, so the first row gets id 1 in a fresh
/// ledger.
///
/// # Errors
///
/// Aborts at the first unreadable row or rejected opening balance. Accounts
/// created from earlier rows stay in the ledger.
pub fn seed_accounts(ledger: &MemoryLedger, path: &Path) -> Result<Vec<AccountId>, String> {
    let mut reader = open_csv(path)?;
    let mut ids = Vec::new();

    for (index, row) in reader.deserialize::<AccountCsvRecord>().enumerate() {
        let line = index + 2;
        let record = row.map_err(|e| format!("CSV parse error at line {}: {}", line, e))?;
        let seed = convert_account_record(record).map_err(|e| format!("Line {}: {}", line, e))?;
        let id = ledger
            .create_account(seed.owner, seed.balance, seed.currency)
            .map_err(|e| format!("Line {}: {}", line, e))?;
        ids.push(id);
    }

    info!(accounts = ids.len(), path = %path.display(), "ledger seeded");
    Ok(ids)
}
