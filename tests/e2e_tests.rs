//! End-to-end integration tests
//!
//! These tests validate the complete settle-up pipeline using predefined CSV
//! test fixtures. Each test:
//! 1. Reads ledger.csv and roster.csv from a fixture directory
//! 2. Settles every group with the selected strategy
//! 3. Writes the selected report
//! 4. Compares actual output with expected_<report>.csv
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - Single-group scenarios (equal split, payment after expense)
//! - Uneven splits and remainder distribution
//! - Interleaved groups
//! - References to members outside the roster
//! - Invalid entries and malformed rows
//! - Spending and ledger export reports
//!
//! Each test is run twice: once with the synchronous strategy and once with the async strategy.

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use settle_up_engine::cli::{ReportKind, StrategyType};
    use settle_up_engine::strategy::{create_strategy, BatchConfig, ReportOptions};
    use settle_up_engine::SettlementConfig;
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    fn report_name(report: ReportKind) -> &'static str {
        match report {
            ReportKind::Settlements => "settlements",
            ReportKind::Balances => "balances",
            ReportKind::Spending => "spending",
            ReportKind::Ledger => "ledger",
        }
    }

    /// Run a test fixture and compare the report with its expected file
    ///
    /// # Panics
    ///
    /// Panics if:
    /// - Fixture files cannot be read
    /// - Output doesn't match expected
    fn run_test_fixture(
        fixture_name: &str,
        report: ReportKind,
        strategy_type: StrategyType,
        config: Option<BatchConfig>,
    ) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let ledger_path = format!("{}/ledger.csv", fixture_dir);
        let roster_path = format!("{}/roster.csv", fixture_dir);
        let expected_path = format!("{}/expected_{}.csv", fixture_dir, report_name(report));

        for path in [&ledger_path, &roster_path, &expected_path] {
            assert!(Path::new(path).exists(), "Fixture file not found: {}", path);
        }

        let strategy = create_strategy(
            strategy_type,
            config,
            ReportOptions::new(report, SettlementConfig::default()),
        );

        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");

        strategy
            .process(
                Path::new(&ledger_path),
                Path::new(&roster_path),
                &mut temp_output,
            )
            .unwrap_or_else(|e| panic!("Failed to process ledger: {}", e));

        temp_output.flush().expect("Failed to flush temp file");

        let actual_output = fs::read_to_string(temp_output.path())
            .unwrap_or_else(|e| panic!("Failed to read temp output file: {}", e));
        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (report: {:?}, strategy: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, report, strategy_type, actual_output, expected_output
        );
    }

    /// Settlement and balance reports for all fixtures with both strategies
    #[rstest]
    #[case("dinner")]
    #[case("expense_then_payment")]
    #[case("uneven_split")]
    #[case("multiple_groups")]
    #[case("unknown_members")]
    #[case("invalid_entries")]
    #[case("rounding_remainders")]
    #[case("categories")]
    fn test_fixtures(
        #[case] fixture: &str,
        #[values(ReportKind::Settlements, ReportKind::Balances)] report: ReportKind,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        run_test_fixture(fixture, report, strategy, None);
    }

    /// Reports built from the ledger alone
    #[rstest]
    fn test_ledger_reports(
        #[values(ReportKind::Spending, ReportKind::Ledger)] report: ReportKind,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        run_test_fixture("categories", report, strategy, None);
    }

    /// Async output does not depend on batch size or concurrency
    #[rstest]
    #[case(BatchConfig::new(1, 1))]
    #[case(BatchConfig::new(2, 3))]
    #[case(BatchConfig::new(10_000, 64))]
    fn test_async_batching_is_transparent(#[case] config: BatchConfig) {
        run_test_fixture(
            "multiple_groups",
            ReportKind::Settlements,
            StrategyType::Async,
            Some(config),
        );
    }
}
