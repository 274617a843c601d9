//! Settle-Up Engine Library
//! # Overview
//!
//! This library computes per-member balances of shared-expense groups and the
//! transfers that settle them, reading ledgers from CSV with either a sync or
//! an async strategy.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (LedgerEntry, BalanceSheet, Settlement, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::balance_engine`] - Ledger entries to net balances
//!   - [`core::planner`] - Net balances to settling transfers
//!   - [`core::engine`] - Both stages for one group
//!   - [`core::ledger_book`] - Grouping records and rosters per group
//!   - [`core::analytics`] - Spending per category
//! - [`io`] - CSV input and report output
//! - [`strategy`] - Pluggable sync and async processing pipelines
//!
//! # Entry Types
//!
//! - **Expense**: paid by one member, split equally among its participants
//! - **Payment**: a direct transfer between two members already recorded
//!
//! # Balances
//!
//! For each roster member:
//! - `contributed`: expenses paid, minus payments made, plus payments received
//! - `owed`: equal shares of the expenses the member participates in
//! - `net = contributed - owed`; positive means the group owes the member
//!
//! Net balances of a group always sum to zero. The planner matches debtors
//! against creditors greedily, producing at most `members - 1` transfers.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{BalanceEngine, SettlementConfig, SettlementEngine, SettlementPlanner};
pub use io::write_settlements_csv;
pub use types::{
    BalanceSheet, GroupId, GroupSettlement, LedgerEntry, LedgerRecord, MemberId, Settlement,
    SettleError,
};
