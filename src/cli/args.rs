use crate::core::LedgerConfig;
use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Apply money transfers between ledger accounts
#[derive(Parser, Debug)]
#[command(name = "payments-ledger")]
#[command(about = "Apply money transfers between ledger accounts", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing transfer requests
    #[arg(value_name = "TRANSFERS", help = "Path to the transfers CSV file")]
    pub transfers_file: PathBuf,

    /// Seed CSV file with the opening accounts
    #[arg(
        long = "accounts",
        value_name = "FILE",
        help = "Path to the accounts CSV file (owner,balance,currency)"
    )]
    pub accounts_file: PathBuf,

    /// Processing strategy for the transfer file
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Processing strategy: 'sync' applies transfers in file order, 'async' runs batches concurrently"
    )]
    pub strategy: StrategyType,

    /// Number of transfers per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of transfers per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of concurrent transfers (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of transfers executing concurrently (default: CPU cores)"
    )]
    pub max_concurrent: Option<usize>,

    /// Submissions per transfer on write conflicts (async mode only)
    #[arg(
        long = "max-attempts",
        value_name = "COUNT",
        help = "Attempts per transfer when it loses a write race (default: 8)"
    )]
    pub max_attempts: Option<usize>,

    /// Optional CSV file receiving the payment log
    #[arg(long = "payments-out", value_name = "FILE")]
    pub payments_out: Option<PathBuf>,

    /// Disable the non-negative balance check constraint
    #[arg(long = "no-balance-constraint")]
    pub no_balance_constraint: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", default_value = "text")]
    pub log_format: LogFormat,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Log line formats written to stderr
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Unset options take their defaults. Zero values are rejected by
    /// [`BatchConfig::new`] in favour of the defaults.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_none() && self.max_concurrent.is_none() && self.max_attempts.is_none()
        {
            return BatchConfig::default();
        }

        let default = BatchConfig::default();
        BatchConfig::new(
            self.batch_size.unwrap_or(default.batch_size),
            self.max_concurrent.unwrap_or(default.max_concurrent),
            self.max_attempts.unwrap_or(default.max_attempts),
        )
    }

    pub fn ledger_config(&self) -> LedgerConfig {
        LedgerConfig {
            enforce_non_negative_balance: !self.no_balance_constraint,
        }
    }
}
