//! Processing strategy module for transfer files
//!
//! This module defines the Strategy pattern for running a file of transfer
//! requests against a ledger. Different implementations (sequential,
//! concurrent batches) can be selected at runtime.

use crate::cli::StrategyType;
use crate::core::MemoryLedger;
use std::path::Path;
use std::sync::Arc;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Outcome counts of a processing run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingSummary {
    /// Transfers that committed
    pub committed: usize,

    /// Transfers the engine rejected (validation, business rule or storage failure)
    pub rejected: usize,
}

impl ProcessingSummary {
    pub fn record<E>(&mut self, result: &Result<(), E>) {
        match result {
            Ok(()) => self.committed += 1,
            Err(_) => self.rejected += 1,
        }
    }
}

/// Processing strategy trait for transfer files
pub trait ProcessingStrategy: Send + Sync {
    /// Run every transfer in `transfers_path` against `ledger`
    ///
    /// Individual transfer failures are logged and counted but do not stop
    /// processing.
    ///
    /// # Errors
    ///
    /// Returns an error only for fatal conditions: the input file cannot be
    /// opened or the runtime cannot be started.
    fn process(
        &self,
        ledger: Arc<MemoryLedger>,
        transfers_path: &Path,
    ) -> Result<ProcessingSummary, String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `config` is only used by the async strategy; `None` selects its defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_record() {
        let mut summary = ProcessingSummary::default();
        summary.record::<()>(&Ok(()));
        summary.record(&Err("boom"));
        summary.record::<()>(&Ok(()));

        assert_eq!(
            summary,
            ProcessingSummary {
                committed: 2,
                rejected: 1
            }
        );
    }
}
