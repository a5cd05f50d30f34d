//! Payments Ledger CLI
//!
//! Command-line interface for applying money transfers from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --accounts accounts.csv transfers.csv > balances.csv
//! cargo run -- --accounts accounts.csv --strategy async transfers.csv > balances.csv
//! cargo run -- --accounts accounts.csv --payments-out payments.csv transfers.csv > balances.csv
//! RUST_LOG=debug cargo run -- --accounts accounts.csv --log-format json transfers.csv
//! ```
//!
//! The program seeds a fresh ledger from the accounts file, applies every
//! transfer request with the selected processing strategy and writes the final
//! account states to stdout. Logs go to stderr.
//!
//! # Processing Strategies
//!
//! - **sync**: Transfers applied one at a time in file order (default)
//! - **async**: Batches of transfers applied concurrently
//!
//! # Exit Codes
//!
//! - 0: Success (individual transfers may still have been rejected)
//! - 1: Error (missing arguments, unreadable files, invalid seed data, etc.)

use payments_ledger::cli;
use payments_ledger::core::{MemoryLedger, PaymentFilter};
use payments_ledger::io::{seed_accounts, write_accounts_csv, write_payments_csv};
use payments_ledger::logging;
use payments_ledger::strategy;
use std::fs::File;
use std::io::BufWriter;
use std::process;
use std::sync::Arc;
use tracing::{error, info};

fn run(args: cli::CliArgs) -> Result<(), String> {
    let ledger = Arc::new(MemoryLedger::with_config(args.ledger_config()));
    seed_accounts(&ledger, &args.accounts_file)?;

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    let summary = strategy.process(Arc::clone(&ledger), &args.transfers_file)?;
    info!(
        committed = summary.committed,
        rejected = summary.rejected,
        "transfers processed"
    );

    let mut output = std::io::stdout();
    write_accounts_csv(&ledger.all_accounts(), &mut output)?;

    if let Some(path) = &args.payments_out {
        let file = File::create(path)
            .map_err(|e| format!("Failed to create file '{}': {}", path.display(), e))?;
        let mut writer = BufWriter::new(file);
        write_payments_csv(ledger.as_ref(), &PaymentFilter::default(), &mut writer)?;
    }

    Ok(())
}

fn main() {
    let args = cli::parse_args();

    if let Err(e) = logging::init_logging(&args.log_level, args.log_format) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(args) {
        error!("{}", e);
        process::exit(1);
    }
}
