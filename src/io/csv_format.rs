//! CSV format handling for ledger input and report output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvLedgerRecord / CsvRosterRecord structures for deserialization
//! - Conversion from CSV records to domain types
//! - Report serialization (settlements, balances, spending, ledger export)
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::core::SpendingSummary;
use crate::types::{
    Expense, GroupId, GroupSettlement, LedgerEntry, LedgerRecord, MemberId, Payment,
};
use csv::Writer;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Separator between identifiers in the `participants` column
pub const PARTICIPANT_SEPARATOR: char = ';';

/// Ledger CSV record structure for deserialization
///
/// Columns: group, kind, amount, payer, participants, from, to, category,
/// title, date. Expenses use payer/participants, payments use from/to; the
/// descriptive columns are optional.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CsvLedgerRecord {
    pub group: String,
    pub kind: String,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub payer: Option<String>,
    #[serde(default)]
    pub participants: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Roster CSV record structure: one member of one group per row
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRosterRecord {
    pub group: GroupId,
    pub member: MemberId,
}

/// Treat blank strings as absent
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Convert a CsvLedgerRecord to a LedgerRecord
///
/// This function:
/// - Parses the kind string (case-insensitive) into an entry kind
/// - Parses the amount string into a Decimal
/// - Requires a payer for expenses and both parties for payments
/// - Splits the participants column on `;`
///
/// Amount signs and empty participant lists are not checked here; the balance
/// engine rejects them so that the whole group is aborted instead of the entry
/// being dropped.
///
/// # Returns
///
/// - Ok(LedgerRecord) - Successfully converted record
/// - Err(String) - Error message describing the conversion failure
pub fn convert_csv_record(csv_record: CsvLedgerRecord) -> Result<LedgerRecord, String> {
    let group = csv_record.group.trim().to_string();
    if group.is_empty() {
        return Err("Ledger record has no group".to_string());
    }

    let amount = match present(csv_record.amount) {
        Some(amount_str) => Decimal::from_str(&amount_str).map_err(|_| {
            format!("Invalid amount '{}' in group {}", amount_str, group)
        })?,
        None => {
            return Err(format!(
                "{} in group {} requires an amount",
                csv_record.kind, group
            ))
        }
    };

    let entry = match csv_record.kind.trim().to_lowercase().as_str() {
        "expense" => {
            let payer = present(csv_record.payer)
                .ok_or_else(|| format!("Expense in group {} requires a payer", group))?;
            let participants = present(csv_record.participants)
                .map(|list| {
                    list.split(PARTICIPANT_SEPARATOR)
                        .map(str::trim)
                        .filter(|member| !member.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            LedgerEntry::Expense(Expense {
                amount,
                payer,
                participants,
            })
        }
        "payment" => {
            let from = present(csv_record.from)
                .ok_or_else(|| format!("Payment in group {} requires a 'from' member", group))?;
            let to = present(csv_record.to)
                .ok_or_else(|| format!("Payment in group {} requires a 'to' member", group))?;
            LedgerEntry::Payment(Payment { amount, from, to })
        }
        _ => {
            return Err(format!(
                "Invalid entry kind: '{}' in group {}",
                csv_record.kind, group
            ))
        }
    };

    Ok(LedgerRecord {
        group,
        entry,
        category: present(csv_record.category),
        title: present(csv_record.title),
        date: present(csv_record.date),
    })
}

/// Format an amount with exactly `scale` decimal places
///
/// Zero is always printed unsigned.
pub fn format_amount(amount: Decimal, scale: u32) -> String {
    let amount = if amount.is_zero() {
        Decimal::ZERO
    } else {
        amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
    };
    format!("{:.*}", scale as usize, amount)
}

fn write_error(what: &str) -> impl Fn(csv::Error) -> String + '_ {
    move |e| format!("Failed to write {}: {}", what, e)
}

/// Write settlement transfers in CSV format
///
/// Columns: group, from, to, amount. Groups are written in the order given,
/// transfers in plan order.
pub fn write_settlements_csv(
    groups: &[GroupSettlement],
    scale: u32,
    output: &mut dyn Write,
) -> Result<(), String> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["group", "from", "to", "amount"])
        .map_err(write_error("CSV header"))?;

    for group in groups {
        for settlement in &group.settlements {
            writer
                .write_record([
                    group.group.as_str(),
                    settlement.from.as_str(),
                    settlement.to.as_str(),
                    format_amount(settlement.amount, scale).as_str(),
                ])
                .map_err(write_error("settlement record"))?;
        }
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))
}

/// Write member balances in CSV format
///
/// Columns: group, member, contributed, owed, balance. Members appear in
/// roster order, including members with a zero balance.
pub fn write_balances_csv(
    groups: &[GroupSettlement],
    scale: u32,
    output: &mut dyn Write,
) -> Result<(), String> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["group", "member", "contributed", "owed", "balance"])
        .map_err(write_error("CSV header"))?;

    for group in groups {
        for balance in group.balances.balances() {
            writer
                .write_record([
                    group.group.as_str(),
                    balance.member.as_str(),
                    format_amount(balance.contributed, scale).as_str(),
                    format_amount(balance.owed, scale).as_str(),
                    format_amount(balance.net, scale).as_str(),
                ])
                .map_err(write_error("balance record"))?;
        }
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))
}

/// Write spending per category in CSV format
///
/// Columns: group, category, total. Each group ends with its overall total
/// on a row with an empty category; uncategorized expenses are already
/// listed as `Default`, so the empty category is never a real one.
pub fn write_spending_csv(
    summaries: &[(GroupId, SpendingSummary)],
    scale: u32,
    output: &mut dyn Write,
) -> Result<(), String> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["group", "category", "total"])
        .map_err(write_error("CSV header"))?;

    for (group, summary) in summaries {
        for (category, total) in &summary.by_category {
            writer
                .write_record([
                    group.as_str(),
                    category.as_str(),
                    format_amount(*total, scale).as_str(),
                ])
                .map_err(write_error("spending record"))?;
        }
        writer
            .write_record([
                group.as_str(),
                "",
                format_amount(summary.total, scale).as_str(),
            ])
            .map_err(write_error("spending total"))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))
}

/// Write the plain ledger export
///
/// Columns: Date, Title, Category, Amount, Payer, Shared With, Group ID.
/// Payments export the paying member as payer and the receiving member as
/// the shared-with list.
pub fn write_ledger_csv<'a, I>(records: I, output: &mut dyn Write) -> Result<(), String>
where
    I: IntoIterator<Item = &'a LedgerRecord>,
{
    let mut writer = Writer::from_writer(output);

    writer
        .write_record([
            "Date",
            "Title",
            "Category",
            "Amount",
            "Payer",
            "Shared With",
            "Group ID",
        ])
        .map_err(write_error("CSV header"))?;

    for record in records {
        let (payer, shared_with) = match &record.entry {
            LedgerEntry::Expense(expense) => (
                expense.payer.as_str(),
                expense
                    .participants
                    .join(&PARTICIPANT_SEPARATOR.to_string()),
            ),
            LedgerEntry::Payment(payment) => (payment.from.as_str(), payment.to.clone()),
        };

        writer
            .write_record([
                record.date.as_deref().unwrap_or_default(),
                record.title.as_deref().unwrap_or_default(),
                record.category_or_default(),
                record.entry.amount().to_string().as_str(),
                payer,
                shared_with.as_str(),
                record.group.as_str(),
            ])
            .map_err(write_error("ledger record"))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))
}
