//! Settle-up CLI
//!
//! Command-line interface for settling shared-expense groups from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- ledger.csv roster.csv > settlements.csv
//! cargo run -- --strategy sync ledger.csv roster.csv > settlements.csv
//! cargo run -- --report balances --scale 0 ledger.csv roster.csv > balances.csv
//! cargo run -- --order largest-first --max-concurrent 8 ledger.csv roster.csv
//! RUST_LOG=debug cargo run -- ledger.csv roster.csv
//! ```
//!
//! The program reads the group rosters and the ledger, settles every group
//! with the selected processing strategy and writes the selected report to
//! stdout. Diagnostics go to stderr; the level is controlled by `RUST_LOG`
//! (default: `warn`).
//!
//! # Processing Strategies
//!
//! - **sync**: Groups are settled one after the other
//! - **async**: Batched reading, groups settled concurrently (default)
//!
//! # Exit Codes
//!
//! - 0: Success (groups that failed to settle are logged and left out)
//! - 1: Error (missing arguments, file not found, malformed roster, etc.)

use settle_up_engine::cli;
use settle_up_engine::strategy;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config, args.to_report_options())
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.ledger_file, &args.roster_file, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
