//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of the
//! ProcessingStrategy trait. It orchestrates settlement by coordinating the
//! readers (CSV input), the SettlementEngine (business logic) and the report
//! writers.
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - Roster loading to `roster_reader::read_rosters`
//! - Ledger parsing to `SyncReader` (iterator interface)
//! - Grouping records to `LedgerBook`
//! - Settlement to `SettlementEngine`, one group after the other
//! - CSV output to the `csv_format` writers
//!
//! # Memory
//!
//! Balances are only known once a group's last entry has been read, so the
//! records of every group are kept until the end of the file.

use crate::core::{LedgerBook, SettlementEngine};
use crate::io::roster_reader::read_rosters;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{write_ledger_report, write_settlement_report, ProcessingStrategy, ReportOptions};
use crate::types::GroupSettlement;
use std::io::Write;
use std::path::Path;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use settle_up_engine::strategy::{ProcessingStrategy, ReportOptions, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(ReportOptions::default());
/// let mut output = io::stdout();
///
/// strategy
///     .process(Path::new("ledger.csv"), Path::new("roster.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SyncProcessingStrategy {
    options: ReportOptions,
}

impl SyncProcessingStrategy {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Settle every group in the ledger and write the report
    ///
    /// 1. Loads the rosters
    /// 2. Streams ledger records into a LedgerBook, skipping malformed rows
    /// 3. Settles each group with a SettlementEngine
    /// 4. Writes the selected report
    fn process(
        &self,
        ledger_path: &Path,
        roster_path: &Path,
        output: &mut dyn Write,
    ) -> Result<(), String> {
        let rosters = read_rosters(roster_path).map_err(|e| e.to_string())?;
        let reader = SyncReader::new(ledger_path)?;

        let mut book = LedgerBook::new();
        for result in reader {
            match result {
                Ok(record) => book.push(record),
                Err(e) => tracing::warn!(error = %e, "Skipping ledger record"),
            }
        }
        tracing::info!(
            records = book.record_count(),
            groups = book.groups().count(),
            "Ledger loaded"
        );

        if !self.options.report.needs_settlement() {
            return write_ledger_report(&self.options, &book, output);
        }

        let engine = SettlementEngine::new(self.options.settlement.clone());
        let mut settled: Vec<GroupSettlement> = Vec::new();
        for job in book.into_jobs(&rosters) {
            match engine.settle_records(&job.group, &job.roster, &job.records) {
                Ok(settlement) => settled.push(settlement),
                Err(e) => tracing::error!(group = %job.group, error = %e, "Failed to settle group"),
            }
        }

        write_settlement_report(&self.options, &settled, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ReportKind;
    use crate::core::SettlementConfig;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "group,kind,amount,payer,participants,from,to,category,title,date\n";

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn run(report: ReportKind, ledger_rows: &str, roster: &str) -> Result<String, String> {
        let ledger = create_temp_csv(&format!("{}{}", HEADER, ledger_rows));
        let roster = create_temp_csv(roster);

        let strategy =
            SyncProcessingStrategy::new(ReportOptions::new(report, SettlementConfig::default()));
        let mut output = Vec::new();
        strategy.process(ledger.path(), roster.path(), &mut output)?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_sync_strategy_settles_dinner() {
        let output = run(
            ReportKind::Settlements,
            "dinner,expense,150,A,A;B;C,,,,,\n",
            "group,member\ndinner,A\ndinner,B\ndinner,C\n",
        )
        .unwrap();

        assert_eq!(
            output,
            "group,from,to,amount\ndinner,B,A,50.00\ndinner,C,A,50.00\n"
        );
    }

    #[test]
    fn test_sync_strategy_writes_balances() {
        let output = run(
            ReportKind::Balances,
            "dinner,expense,100,A,A;B;C,,,,,\n",
            "group,member\ndinner,A\ndinner,B\ndinner,C\n",
        )
        .unwrap();

        assert_eq!(
            output,
            "group,member,contributed,owed,balance\n\
             dinner,A,100.00,33.34,66.66\n\
             dinner,B,0.00,33.33,-33.33\n\
             dinner,C,0.00,33.33,-33.33\n"
        );
    }

    #[test]
    fn test_sync_strategy_handles_missing_file() {
        let roster = create_temp_csv("group,member\ng,A\n");
        let strategy = SyncProcessingStrategy::default();
        let mut output = Vec::new();

        let result = strategy.process(Path::new("nonexistent.csv"), roster.path(), &mut output);
        assert!(result.unwrap_err().contains("Failed to open file"));
    }

    #[test]
    fn test_sync_strategy_continues_on_malformed_record() {
        let output = run(
            ReportKind::Settlements,
            "g,expense,ten,A,A;B,,,,,\n\
             g,expense,20,A,A;B,,,,,\n",
            "group,member\ng,A\ng,B\n",
        )
        .unwrap();

        assert_eq!(output, "group,from,to,amount\ng,B,A,10.00\n");
    }

    #[test]
    fn test_sync_strategy_omits_failed_group() {
        // Group "bad" has a negative expense and fails as a whole
        let output = run(
            ReportKind::Settlements,
            "bad,expense,-5,A,A;B,,,,,\n\
             good,payment,8,,,B,A,,,\n",
            "group,member\nbad,A\nbad,B\ngood,A\ngood,B\n",
        )
        .unwrap();

        assert_eq!(output, "group,from,to,amount\ngood,B,A,8.00\n");
    }

    #[test]
    fn test_sync_strategy_writes_spending_without_settling() {
        // Group without a roster would fail to settle but still has spending
        let output = run(
            ReportKind::Spending,
            "g,expense,20,A,A;B,,,Food,,\n",
            "group,member\n",
        )
        .unwrap();

        assert_eq!(output, "group,category,total\ng,Food,20.00\ng,,20.00\n");
    }

    #[test]
    fn test_sync_strategy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SyncProcessingStrategy>();
    }
}
