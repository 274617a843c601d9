//! Core settlement logic module
//!
//! This module contains the settlement components:
//! - `config` - Tolerance, currency unit and planner ordering
//! - `balance_engine` - Ledger entries to per-member net balances
//! - `planner` - Net balances to settling transfers
//! - `engine` - Both stages run in sequence for one group
//! - `ledger_book` - Per-group assembly of ledger records and rosters
//! - `analytics` - Spending totals per category
//! - `async` - Concurrent settlement of many groups

pub mod analytics;
pub mod r#async;
pub mod balance_engine;
pub mod config;
pub mod engine;
pub mod ledger_book;
pub mod planner;

pub use analytics::SpendingSummary;
pub use balance_engine::BalanceEngine;
pub use config::{PartyOrder, SettlementConfig};
pub use engine::SettlementEngine;
pub use ledger_book::{GroupJob, LedgerBook, Rosters};
pub use planner::SettlementPlanner;
pub use r#async::BatchProcessor;
