//! I/O module
//!
//! Handles CSV parsing and report output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, report serialization)
//! - `sync_reader` - Synchronous ledger reader with iterator interface
//! - `async_reader` - Asynchronous ledger reader with batch reading interface
//! - `roster_reader` - Group roster loading

pub mod async_reader;
pub mod csv_format;
pub mod roster_reader;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{
    convert_csv_record, format_amount, write_balances_csv, write_ledger_csv,
    write_settlements_csv, write_spending_csv, CsvLedgerRecord, CsvRosterRecord,
};
pub use roster_reader::{read_rosters, read_rosters_from};
pub use sync_reader::SyncReader;
