use crate::core::{PartyOrder, SettlementConfig};
use crate::strategy::{BatchConfig, ReportOptions};
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Compute group balances and the transfers that settle them
#[derive(Parser, Debug)]
#[command(name = "settle-up")]
#[command(about = "Compute group balances and the transfers that settle them", long_about = None)]
pub struct CliArgs {
    /// Ledger CSV file with the expense and payment records of all groups
    #[arg(value_name = "LEDGER", help = "Path to the ledger CSV file")]
    pub ledger_file: PathBuf,

    /// Roster CSV file listing the members of every group in order
    #[arg(value_name = "ROSTER", help = "Path to the roster CSV file")]
    pub roster_file: PathBuf,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for sequential or 'async' for concurrent groups"
    )]
    pub strategy: StrategyType,

    /// Report written to stdout
    #[arg(long = "report", value_name = "REPORT", default_value = "settlements")]
    pub report: ReportKind,

    /// Largest debt/credit imbalance absorbed instead of reported
    #[arg(long = "tolerance", value_name = "AMOUNT", default_value = "0.01")]
    pub tolerance: Decimal,

    /// Decimal places of the smallest currency unit
    #[arg(long = "scale", value_name = "PLACES", default_value_t = 2)]
    pub scale: u32,

    /// Order in which debtors and creditors are matched
    #[arg(long = "order", value_name = "ORDER", default_value = "roster")]
    pub order: OrderingType,

    /// Fail a group whose entries reference members outside its roster
    #[arg(long = "strict-membership")]
    pub strict_membership: bool,

    /// Number of ledger records per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of ledger records per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of groups settling concurrently (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of groups settling concurrently (default: CPU cores)"
    )]
    pub max_concurrent_groups: Option<usize>,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Available reports
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Transfers settling every group
    #[default]
    Settlements,
    /// Contributed, owed and net balance per member
    Balances,
    /// Expense totals per category
    Spending,
    /// Plain ledger export
    Ledger,
}

impl ReportKind {
    /// Whether the report is built from settled groups rather than raw records
    pub fn needs_settlement(self) -> bool {
        matches!(self, ReportKind::Settlements | ReportKind::Balances)
    }
}

/// Planner matching orders
#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum OrderingType {
    /// Roster order
    Roster,
    /// Largest amounts first
    LargestFirst,
}

impl From<OrderingType> for PartyOrder {
    fn from(order: OrderingType) -> Self {
        match order {
            OrderingType::Roster => PartyOrder::Roster,
            OrderingType::LargestFirst => PartyOrder::LargestFirst,
        }
    }
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values fall back to the defaults; zero values are replaced by
    /// the defaults with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_groups.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_groups
                    .unwrap_or(default.max_concurrent_groups),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Create a SettlementConfig from CLI arguments
    pub fn to_settlement_config(&self) -> SettlementConfig {
        SettlementConfig::new(
            self.tolerance,
            self.scale,
            self.order.into(),
            self.strict_membership,
        )
    }

    /// Report and settlement options for the selected strategy
    pub fn to_report_options(&self) -> ReportOptions {
        ReportOptions::new(self.report, self.to_settlement_config())
    }
}
