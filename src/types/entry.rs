//! Ledger entry types for the settle-up engine
//!
//! This module defines the immutable records of money movement within a group
//! and the identifiers used to address groups and members.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Member identifier
///
/// An opaque, stable string such as an email address or a user id.
pub type MemberId = String;

/// Group identifier
pub type GroupId = String;

/// Category used when a record carries none
pub const DEFAULT_CATEGORY: &str = "Default";

/// The two kinds of ledger entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Money fronted by one member on behalf of several participants
    Expense,

    /// A direct transfer between two members that was already recorded
    Payment,
}

/// A shared expense
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// Amount in currency units, expected to be positive
    pub amount: Decimal,

    /// Member who fronted the money
    pub payer: MemberId,

    /// Members sharing the cost equally
    ///
    /// Duplicates carry no meaning; the split counts distinct identifiers.
    /// An empty list is a data error reported by the balance engine.
    pub participants: Vec<MemberId>,
}

/// A recorded payment between two members
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    /// Amount in currency units, expected to be positive
    pub amount: Decimal,

    /// Member who paid
    pub from: MemberId,

    /// Member who received
    pub to: MemberId,
}

/// Immutable record of money movement within a single group
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEntry {
    Expense(Expense),
    Payment(Payment),
}

impl LedgerEntry {
    /// Convenience constructor for an expense
    pub fn expense<P, I, S>(amount: Decimal, payer: P, participants: I) -> Self
    where
        P: Into<MemberId>,
        I: IntoIterator<Item = S>,
        S: Into<MemberId>,
    {
        LedgerEntry::Expense(Expense {
            amount,
            payer: payer.into(),
            participants: participants.into_iter().map(Into::into).collect(),
        })
    }

    /// Convenience constructor for a payment
    pub fn payment(amount: Decimal, from: impl Into<MemberId>, to: impl Into<MemberId>) -> Self {
        LedgerEntry::Payment(Payment {
            amount,
            from: from.into(),
            to: to.into(),
        })
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            LedgerEntry::Expense(_) => EntryKind::Expense,
            LedgerEntry::Payment(_) => EntryKind::Payment,
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            LedgerEntry::Expense(expense) => expense.amount,
            LedgerEntry::Payment(payment) => payment.amount,
        }
    }
}

/// A ledger entry as delivered by the surrounding application
///
/// Carries the owning group and the descriptive fields shown in the
/// analytics screen and the CSV export. None of the metadata affects
/// balances.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRecord {
    /// Group the entry belongs to
    pub group: GroupId,

    /// The money movement itself
    pub entry: LedgerEntry,

    /// Spending category (analytics fall back to [`DEFAULT_CATEGORY`])
    pub category: Option<String>,

    /// Free-form title
    pub title: Option<String>,

    /// Date as recorded upstream, passed through untouched
    pub date: Option<String>,
}

impl LedgerRecord {
    /// Create a record without metadata
    pub fn new(group: impl Into<GroupId>, entry: LedgerEntry) -> Self {
        LedgerRecord {
            group: group.into(),
            entry,
            category: None,
            title: None,
            date: None,
        }
    }

    /// Category, or [`DEFAULT_CATEGORY`] when absent
    pub fn category_or_default(&self) -> &str {
        self.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }
}
