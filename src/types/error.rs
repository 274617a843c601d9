//! Error types for the settle-up engine
//!
//! Every failure is a distinct variant so callers can tell which invariant
//! broke. Ledger errors abort the computation for one group only; I/O errors
//! are fatal for the whole run.
//!
//! # Error Categories
//!
//! - **Ledger Errors**: invalid entries, unknown members (strict mode)
//! - **Consistency Errors**: balances that do not sum to zero, unsettled residue
//! - **Arithmetic Errors**: decimal overflow while accumulating
//! - **File I/O / CSV Errors**: file not found, malformed CSV

use super::entry::MemberId;
use rust_decimal::Decimal;
use std::path::Path;
use thiserror::Error;

/// Main error type for the settle-up engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettleError {
    /// An entry that can never contribute to a balance
    ///
    /// Raised for expenses without participants, non-positive amounts and
    /// amounts finer than the configured currency unit. The group's
    /// computation is aborted rather than silently dropping the entry.
    #[error("Invalid ledger entry {entry}: {reason}")]
    InvalidEntry {
        /// Position of the entry in the group's ledger
        entry: usize,
        /// What is wrong with it
        reason: String,
    },

    /// An entry references an identifier outside the roster
    ///
    /// Only raised with strict membership; by default the reference is
    /// ignored and reported on the balance sheet instead.
    #[error("Ledger entry {entry} references unknown member '{member}'")]
    UnknownMember {
        /// Position of the entry in the group's ledger
        entry: usize,
        /// The identifier that is not on the roster
        member: MemberId,
    },

    /// Balances do not cancel out
    ///
    /// Indicates a data or logic defect upstream. Never auto-corrected.
    #[error("Imbalance detected in {stage}: residual {residual}")]
    ImbalanceInconsistency {
        /// Where the inconsistency was detected
        stage: String,
        /// Amount left over
        residual: Decimal,
    },

    /// Decimal overflow while accumulating balances
    #[error("Arithmetic overflow in {operation}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
    },

    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for SettleError {
    fn from(error: std::io::Error) -> Self {
        SettleError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for SettleError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        SettleError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl SettleError {
    /// Create an InvalidEntry error
    pub fn invalid_entry(entry: usize, reason: impl Into<String>) -> Self {
        SettleError::InvalidEntry {
            entry,
            reason: reason.into(),
        }
    }

    /// Create an UnknownMember error
    pub fn unknown_member(entry: usize, member: &str) -> Self {
        SettleError::UnknownMember {
            entry,
            member: member.to_string(),
        }
    }

    /// Create an ImbalanceInconsistency error
    pub fn imbalance(stage: &str, residual: Decimal) -> Self {
        SettleError::ImbalanceInconsistency {
            stage: stage.to_string(),
            residual,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str) -> Self {
        SettleError::ArithmeticOverflow {
            operation: operation.to_string(),
        }
    }

    /// Create the error for a file that could not be opened
    pub fn file_error(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => SettleError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => SettleError::IoError {
                message: format!("{}: {}", path.display(), error),
            },
        }
    }
}
