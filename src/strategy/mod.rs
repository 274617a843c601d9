//! Processing strategy module for group settlement
//!
//! This module defines the Strategy pattern for complete settle-up pipelines,
//! encompassing CSV parsing, per-group settlement and report output. This allows
//! different processing implementations (synchronous, asynchronous batch) to be
//! selected at runtime.

use crate::cli::{ReportKind, StrategyType};
use crate::core::{LedgerBook, SettlementConfig, SpendingSummary};
use crate::io::csv_format::{
    write_balances_csv, write_ledger_csv, write_settlements_csv, write_spending_csv,
};
use crate::types::GroupSettlement;
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// What to compute and how to print it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportOptions {
    /// Report written to the output
    pub report: ReportKind,

    /// Settlement parameters; the scale also sets the printed decimal places
    pub settlement: SettlementConfig,
}

impl ReportOptions {
    pub fn new(report: ReportKind, settlement: SettlementConfig) -> Self {
        Self { report, settlement }
    }
}

/// Processing strategy trait for complete settle-up pipelines
///
/// Each strategy reads the group rosters and the ledger, settles every group and
/// writes the selected report to output.
pub trait ProcessingStrategy: Send + Sync {
    /// Process a ledger and write the report to output
    ///
    /// # Arguments
    ///
    /// * `ledger_path` - CSV file with expense and payment records of all groups
    /// * `roster_path` - CSV file listing the members of every group, in order
    /// * `output` - Writer receiving the report
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Either input file cannot be opened
    /// - The roster file is malformed
    /// - Output cannot be written
    ///
    /// Malformed ledger rows and groups that fail to settle are logged and left
    /// out of the report; they do not cause this method to return an error.
    fn process(
        &self,
        ledger_path: &Path,
        roster_path: &Path,
        output: &mut dyn Write,
    ) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Optional configuration for async batch processing (ignored for sync)
/// * `options` - Report and settlement options shared by both strategies
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
    options: ReportOptions,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(options)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config, options))
        }
    }
}

/// Write a report that only needs the ledger records
fn write_ledger_report(
    options: &ReportOptions,
    book: &LedgerBook,
    output: &mut dyn Write,
) -> Result<(), String> {
    match options.report {
        ReportKind::Spending => {
            let summaries = book
                .groups()
                .map(|(group, records)| {
                    SpendingSummary::from_records(records)
                        .map(|summary| (group.clone(), summary))
                        .map_err(|e| format!("Group {}: {}", group, e))
                })
                .collect::<Result<Vec<_>, String>>()?;
            write_spending_csv(&summaries, options.settlement.scale, output)
        }
        ReportKind::Ledger => write_ledger_csv(book.iter(), output),
        ReportKind::Settlements | ReportKind::Balances => {
            Err(format!("{:?} report needs settled groups", options.report))
        }
    }
}

/// Write a report built from settled groups
fn write_settlement_report(
    options: &ReportOptions,
    settled: &[GroupSettlement],
    output: &mut dyn Write,
) -> Result<(), String> {
    let scale = options.settlement.scale;
    match options.report {
        ReportKind::Settlements => write_settlements_csv(settled, scale, output),
        ReportKind::Balances => write_balances_csv(settled, scale, output),
        ReportKind::Spending | ReportKind::Ledger => {
            Err(format!("{:?} report is built from the ledger", options.report))
        }
    }
}
