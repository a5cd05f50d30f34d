//! Concurrent batch processing of transfer intents
//!
//! This module provides the `BatchProcessor` struct, which runs a batch of
//! transfers concurrently against a shared [`TransferEngine`].
//!
//! # Design
//!
//! Every transfer is executed on tokio's blocking pool (the engine is
//! synchronous and may wait on the datastore), with at most
//! `max_concurrent` transfers in flight. Each one opens its own transactional
//! scope, so consistency between transfers touching the same account is left
//! to the datastore.
//!
//! # Retry Policy
//!
//! The engine never retries. A transfer that lost a write race is rolled back
//! and reported as a retryable storage failure; the processor re-submits such
//! transfers up to `max_attempts` times in total. Every other failure is final.
//!
//! ```text
//! BatchProcessor
//!     ├── TransferEngine<S>  (shared, cloned per task)
//!     └── max_concurrent / max_attempts
//! ```

use futures::stream::{self, StreamExt};
use tracing::{debug, error};

use crate::core::engine::TransferEngine;
use crate::core::traits::Datastore;
use crate::types::{TransferError, TransferIntent};

/// Result of processing a single transfer
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The intent that was processed
    pub intent: TransferIntent,

    /// Number of times the transfer was submitted to the engine
    pub attempts: usize,

    /// Outcome of the final attempt
    pub result: Result<(), TransferError>,
}

/// Batch processor running transfers concurrently
#[derive(Debug)]
pub struct BatchProcessor<S> {
    engine: TransferEngine<S>,
    max_concurrent: usize,
    max_attempts: usize,
}

impl<S> Clone for BatchProcessor<S> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            max_concurrent: self.max_concurrent,
            max_attempts: self.max_attempts,
        }
    }
}

impl<S: Datastore + 'static> BatchProcessor<S> {
    /// Create a new BatchProcessor
    ///
    /// Zero values for `max_concurrent` or `max_attempts` are raised to 1.
    pub fn new(engine: TransferEngine<S>, max_concurrent: usize, max_attempts: usize) -> Self {
        Self {
            engine,
            max_concurrent: max_concurrent.max(1),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Execute one transfer, re-submitting it while it fails with a retryable error
    ///
    /// Blocking; called from tokio's blocking pool.
    pub fn process_one(&self, intent: TransferIntent) -> ProcessingResult {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let result = self.engine.execute(&intent);
            match result {
                Err(ref e) if e.is_retryable() && attempts < self.max_attempts => {
                    debug!(attempts, "retrying transfer after conflict: {}", e);
                    std::thread::yield_now();
                }
                result => {
                    return ProcessingResult {
                        intent,
                        attempts,
                        result,
                    }
                }
            }
        }
    }

    /// Process a batch of transfers concurrently
    ///
    /// # Returns
    ///
    /// One `ProcessingResult` per intent that ran to completion. Results are in
    /// completion order, not input order. A task that panicked is logged and
    /// omitted.
    pub async fn process_batch(&self, batch: Vec<TransferIntent>) -> Vec<ProcessingResult> {
        stream::iter(batch)
            .map(|intent| {
                let processor = self.clone();
                tokio::task::spawn_blocking(move || processor.process_one(intent))
            })
            .buffer_unordered(self.max_concurrent)
            .filter_map(|joined| async move {
                match joined {
                    Ok(result) => Some(result),
                    Err(e) => {
                        error!("transfer task panicked: {:?}", e);
                        None
                    }
                }
            })
            .collect::<Vec<_>>()
            .await
    }
}
