//! Synchronous processing strategy
//!
//! Applies transfers one at a time, in file order, on the calling thread.
//! Results are therefore deterministic for any input.
//!
//! The strategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Transfer execution to `TransferEngine`

use crate::core::{MemoryLedger, TransferEngine};
use crate::io::sync_reader::SyncReader;
use crate::strategy::{ProcessingStrategy, ProcessingSummary};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use payments_ledger::core::MemoryLedger;
/// use payments_ledger::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::sync::Arc;
///
/// let ledger = Arc::new(MemoryLedger::new());
/// let summary = SyncProcessingStrategy
///     .process(ledger, Path::new("transfers.csv"))
///     .expect("Processing failed");
/// println!("{} committed", summary.committed);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(
        &self,
        ledger: Arc<MemoryLedger>,
        transfers_path: &Path,
    ) -> Result<ProcessingSummary, String> {
        let engine = TransferEngine::new(ledger);
        let reader = SyncReader::new(transfers_path)?;
        let mut summary = ProcessingSummary::default();

        for row in reader {
            match row {
                Ok(intent) => {
                    // Failures are logged by the engine
                    let result = engine.execute(&intent);
                    summary.record(&result);
                }
                Err(e) => warn!("CSV parsing error: {}", e),
            }
        }

        Ok(summary)
    }
}
