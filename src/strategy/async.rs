//! Asynchronous batch processing strategy
//!
//! Reads transfer requests in batches and runs each batch concurrently.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent, max_attempts)
//!     ├── AsyncReader (batch CSV reading)
//!     └── BatchProcessor (bounded concurrency + conflict retries)
//!         └── TransferEngine<MemoryLedger>
//! ```
//!
//! # Ordering
//!
//! Batches are processed one after another, so every transfer in batch `n`
//! completes before batch `n + 1` starts. Within a batch there is no ordering:
//! transfers competing for the same funds may land in any order. The final
//! ledger therefore matches the sync strategy whenever a batch's outcome does
//! not depend on order.

use crate::core::{BatchProcessor, MemoryLedger, TransferEngine};
use crate::io::async_reader::AsyncReader;
use crate::strategy::{ProcessingStrategy, ProcessingSummary};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of transfers per batch
    pub batch_size: usize,
    /// Maximum number of transfers executing at once
    pub max_concurrent: usize,
    /// Total submissions allowed per transfer when it keeps losing write races
    pub max_attempts: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent: num_cpus::get(),
            max_attempts: 8,
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values are replaced by the defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent: usize, max_attempts: usize) -> Self {
        let default = Self::default();

        Self {
            batch_size: non_zero_or("batch_size", batch_size, default.batch_size),
            max_concurrent: non_zero_or("max_concurrent", max_concurrent, default.max_concurrent),
            max_attempts: non_zero_or("max_attempts", max_attempts, default.max_attempts),
        }
    }
}

fn non_zero_or(name: &str, value: usize, default: usize) -> usize {
    if value == 0 {
        warn!("Invalid {} ({}), using default ({})", name, value, default);
        default
    } else {
        value
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Run the transfer file through the batch pipeline
    ///
    /// 1. Starts a multi-threaded tokio runtime
    /// 2. Reads transfers in batches using AsyncReader
    /// 3. Hands each batch to the BatchProcessor and waits for it to finish
    /// 4. Tallies the outcome of every transfer
    fn process(
        &self,
        ledger: Arc<MemoryLedger>,
        transfers_path: &Path,
    ) -> Result<ProcessingSummary, String> {
        let threads = self.config.max_concurrent.max(1);
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(threads)
            .max_blocking_threads(threads)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        runtime.block_on(async {
            let processor = BatchProcessor::new(
                TransferEngine::new(ledger),
                self.config.max_concurrent,
                self.config.max_attempts,
            );

            let file = tokio::fs::File::open(transfers_path).await.map_err(|e| {
                format!(
                    "Failed to open file '{}': {}",
                    transfers_path.display(),
                    e
                )
            })?;

            // csv-async reads futures::io, tokio files need the compat layer
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);
            let mut summary = ProcessingSummary::default();

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                for outcome in processor.process_batch(batch).await {
                    if outcome.attempts > 1 {
                        debug!(attempts = outcome.attempts, "transfer needed retries");
                    }
                    summary.record(&outcome.result);
                }
            }

            Ok(summary)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn ledger_with(balances: &[i64]) -> Arc<MemoryLedger> {
        let ledger = Arc::new(MemoryLedger::new());
        for (i, balance) in balances.iter().enumerate() {
            ledger
                .create_account(format!("owner{i}"), Decimal::new(*balance, 0), "USD")
                .unwrap();
        }
        ledger
    }

    #[test]
    fn test_batch_config_zero_values_fall_back() {
        let config = BatchConfig::new(0, 0, 0);
        assert_eq!(config, BatchConfig::default());
    }

    #[test]
    fn test_async_strategy_processes_transfers() {
        let file = create_temp_csv("source,destination,amount\n1,2,10\n3,4,5\n2,1,1\n");
        let ledger = ledger_with(&[100, 100, 100, 100]);

        let summary = AsyncProcessingStrategy::new(BatchConfig::default())
            .process(Arc::clone(&ledger), file.path())
            .unwrap();

        assert_eq!(summary.committed, 3);
        let balances: Vec<_> = ledger.all_accounts().into_iter().map(|a| a.balance).collect();
        assert_eq!(
            balances,
            vec![
                Decimal::new(91, 0),
                Decimal::new(109, 0),
                Decimal::new(95, 0),
                Decimal::new(105, 0)
            ]
        );
    }

    #[test]
    fn test_async_strategy_maintains_ordering_across_batches() {
        // Account 2 can only pay back once the first batch has landed
        let file = create_temp_csv("source,destination,amount\n1,2,50\n2,3,50\n3,1,50\n");
        let ledger = ledger_with(&[50, 0, 0]);

        let config = BatchConfig::new(1, 4, 8);
        let summary = AsyncProcessingStrategy::new(config)
            .process(Arc::clone(&ledger), file.path())
            .unwrap();

        assert_eq!(summary.committed, 3);
        assert_eq!(ledger.all_accounts()[0].balance, Decimal::new(50, 0));
    }

    #[test]
    fn test_async_strategy_never_overdraws() {
        let file = create_temp_csv(
            "source,destination,amount\n1,2,60\n1,3,60\n1,4,60\n1,5,60\n",
        );
        let ledger = ledger_with(&[100, 0, 0, 0, 0]);

        let summary = AsyncProcessingStrategy::new(BatchConfig::new(10, 4, 8))
            .process(Arc::clone(&ledger), file.path())
            .unwrap();

        assert_eq!(summary.committed, 1);
        assert_eq!(summary.rejected, 3);
        assert_eq!(ledger.all_accounts()[0].balance, Decimal::new(40, 0));
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let strategy = AsyncProcessingStrategy::new(BatchConfig::default());

        let result = strategy.process(ledger_with(&[]), Path::new("nonexistent.csv"));

        assert!(result.unwrap_err().contains("Failed to open file"));
    }
}
