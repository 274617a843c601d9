//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `entry`: Ledger entries, records and identifiers
//! - `balance`: Balance sheets and settlement transfers derived from the ledger
//! - `error`: Error types for the settle-up engine

pub mod balance;
pub mod entry;
pub mod error;

pub use balance::{BalanceSheet, GroupSettlement, MemberBalance, Settlement, SkippedReference};
pub use entry::{
    EntryKind, Expense, GroupId, LedgerEntry, LedgerRecord, MemberId, Payment, DEFAULT_CATEGORY,
};
pub use error::SettleError;
