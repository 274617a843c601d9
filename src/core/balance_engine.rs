//! Balance computation
//!
//! Reduces one group's ledger entries to a signed net balance per roster
//! member:
//!
//! - `contributed(m)`: expenses paid by `m`, minus payments made by `m`,
//!   plus payments received by `m`
//! - `owed(m)`: `amount / |participants|` for every expense `m` shares in
//! - `net(m) = contributed(m) - owed(m)`
//!
//! # Rounding
//!
//! Shares are accumulated exactly. The owed column is rounded to the currency
//! unit exactly once, at aggregation, using largest-remainder apportionment:
//! each member's exact amount is truncated to the unit and the leftover units
//! needed to reach the rounded group total go to the members with the largest
//! truncated remainders (ties broken by roster order). The rounded column sums
//! to the rounded total, so no per-member rounding drift accumulates.
//!
//! # Membership
//!
//! The roster is the source of truth. References to identifiers outside it
//! are ignored and recorded on the sheet, or rejected when strict membership
//! is configured.

use crate::core::config::SettlementConfig;
use crate::types::{
    BalanceSheet, LedgerEntry, MemberBalance, MemberId, SettleError, SkippedReference,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::{HashMap, HashSet};

/// Computes per-member net balances for a group
///
/// Stateless apart from its configuration; safe to share across threads and
/// to call concurrently for different groups.
#[derive(Debug, Clone, Default)]
pub struct BalanceEngine {
    config: SettlementConfig,
}

impl BalanceEngine {
    pub fn new(config: SettlementConfig) -> Self {
        BalanceEngine { config }
    }

    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Compute the balance sheet for a roster and its group's entries
    ///
    /// Every roster member appears on the sheet, in roster order, even with a
    /// zero balance. Duplicate roster identifiers are collapsed to their first
    /// occurrence.
    ///
    /// # Errors
    ///
    /// - `InvalidEntry` for an expense without participants, a non-positive
    ///   amount, or an amount finer than the currency unit
    /// - `UnknownMember` for an out-of-roster reference under strict membership
    /// - `ImbalanceInconsistency` if the net balances do not sum to zero within
    ///   tolerance
    /// - `ArithmeticOverflow` if accumulation overflows
    pub fn compute<'a, I>(
        &self,
        roster: &[MemberId],
        entries: I,
    ) -> Result<BalanceSheet, SettleError>
    where
        I: IntoIterator<Item = &'a LedgerEntry>,
    {
        let members = dedup_roster(roster);
        let mut acc = Accumulator::new(&members, self.config.strict_membership);

        for (position, entry) in entries.into_iter().enumerate() {
            self.validate_amount(position, entry.amount())?;

            match entry {
                LedgerEntry::Expense(expense) => {
                    let participants = distinct(&expense.participants);
                    if participants.is_empty() {
                        return Err(SettleError::invalid_entry(
                            position,
                            "expense has no participants",
                        ));
                    }

                    if let Some(payer) = acc.resolve(position, &expense.payer)? {
                        acc.credit(payer, expense.amount)?;
                    }

                    let share = expense
                        .amount
                        .checked_div(Decimal::from(participants.len()))
                        .ok_or_else(|| SettleError::arithmetic_overflow("expense split"))?;

                    for participant in participants {
                        if let Some(index) = acc.resolve(position, participant)? {
                            acc.charge(index, share)?;
                        }
                    }
                }
                LedgerEntry::Payment(payment) => {
                    if let Some(from) = acc.resolve(position, &payment.from)? {
                        acc.debit(from, payment.amount)?;
                    }
                    if let Some(to) = acc.resolve(position, &payment.to)? {
                        acc.credit(to, payment.amount)?;
                    }
                }
            }
        }

        let owed = apportion(&acc.owed, self.config.scale)?;
        let balances = members
            .iter()
            .zip(acc.contributed.iter().zip(owed))
            .map(|(member, (&contributed, owed))| {
                let net = contributed
                    .checked_sub(owed)
                    .ok_or_else(|| SettleError::arithmetic_overflow("net balance"))?;
                Ok(MemberBalance {
                    member: (*member).to_string(),
                    contributed,
                    owed,
                    net,
                })
            })
            .collect::<Result<Vec<_>, SettleError>>()?;

        let sheet = BalanceSheet::new(balances, acc.skipped);
        let total = sheet
            .total()
            .ok_or_else(|| SettleError::arithmetic_overflow("balance totals"))?;
        if !self.config.is_negligible(total) {
            return Err(SettleError::imbalance("balance totals", total));
        }

        tracing::debug!(
            members = sheet.len(),
            skipped = sheet.skipped().len(),
            "Computed balance sheet"
        );

        Ok(sheet)
    }

    fn validate_amount(&self, position: usize, amount: Decimal) -> Result<(), SettleError> {
        if amount <= Decimal::ZERO {
            return Err(SettleError::invalid_entry(
                position,
                format!("amount {} must be positive", amount),
            ));
        }
        if amount.normalize().scale() > self.config.scale {
            return Err(SettleError::invalid_entry(
                position,
                format!(
                    "amount {} is finer than the currency unit {}",
                    amount,
                    self.config.unit()
                ),
            ));
        }
        Ok(())
    }
}

/// Running per-member totals, indexed by roster position
struct Accumulator<'r> {
    index: HashMap<&'r str, usize>,
    contributed: Vec<Decimal>,
    owed: Vec<Decimal>,
    skipped: Vec<SkippedReference>,
    strict: bool,
}

impl<'r> Accumulator<'r> {
    fn new(members: &[&'r str], strict: bool) -> Self {
        Accumulator {
            index: members
                .iter()
                .enumerate()
                .map(|(position, member)| (*member, position))
                .collect(),
            contributed: vec![Decimal::ZERO; members.len()],
            owed: vec![Decimal::ZERO; members.len()],
            skipped: Vec::new(),
            strict,
        }
    }

    /// Roster position of `member`, or `None` if the reference is ignored
    fn resolve(&mut self, entry: usize, member: &str) -> Result<Option<usize>, SettleError> {
        if let Some(&position) = self.index.get(member) {
            return Ok(Some(position));
        }
        if self.strict {
            return Err(SettleError::unknown_member(entry, member));
        }

        tracing::warn!(entry, member, "Ignoring reference to member outside the roster");
        self.skipped.push(SkippedReference {
            entry,
            member: member.to_string(),
        });
        Ok(None)
    }

    fn credit(&mut self, member: usize, amount: Decimal) -> Result<(), SettleError> {
        let slot = &mut self.contributed[member];
        *slot = slot
            .checked_add(amount)
            .ok_or_else(|| SettleError::arithmetic_overflow("contribution"))?;
        Ok(())
    }

    fn debit(&mut self, member: usize, amount: Decimal) -> Result<(), SettleError> {
        let slot = &mut self.contributed[member];
        *slot = slot
            .checked_sub(amount)
            .ok_or_else(|| SettleError::arithmetic_overflow("contribution"))?;
        Ok(())
    }

    fn charge(&mut self, member: usize, share: Decimal) -> Result<(), SettleError> {
        let slot = &mut self.owed[member];
        *slot = slot
            .checked_add(share)
            .ok_or_else(|| SettleError::arithmetic_overflow("owed share"))?;
        Ok(())
    }
}

fn dedup_roster(roster: &[MemberId]) -> Vec<&str> {
    let mut seen = HashSet::new();
    roster
        .iter()
        .map(String::as_str)
        .filter(|member| {
            let fresh = seen.insert(*member);
            if !fresh {
                tracing::warn!(member, "Duplicate roster member ignored");
            }
            fresh
        })
        .collect()
}

fn distinct(participants: &[MemberId]) -> Vec<&str> {
    let mut seen = HashSet::new();
    participants
        .iter()
        .map(String::as_str)
        .filter(|participant| seen.insert(*participant))
        .collect()
}

/// Sum of `amounts`, failing instead of overflowing
fn checked_sum(amounts: &[Decimal], operation: &str) -> Result<Decimal, SettleError> {
    amounts
        .iter()
        .try_fold(Decimal::ZERO, |total, &amount| total.checked_add(amount))
        .ok_or_else(|| SettleError::arithmetic_overflow(operation))
}

/// Round exact non-negative amounts to `scale` so that they sum to the
/// rounded exact total (largest-remainder method)
fn apportion(exact: &[Decimal], scale: u32) -> Result<Vec<Decimal>, SettleError> {
    let unit = Decimal::new(1, scale);
    let mut rounded: Vec<Decimal> = exact
        .iter()
        .map(|amount| amount.round_dp_with_strategy(scale, RoundingStrategy::ToZero))
        .collect();

    let target = checked_sum(exact, "owed total")?
        .round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    let floor_total = checked_sum(&rounded, "owed total")?;
    let leftover = ((target - floor_total) / unit).to_usize().unwrap_or_default();

    if leftover > 0 {
        let mut by_remainder: Vec<usize> = (0..exact.len()).collect();
        // Stable sort keeps roster order among equal remainders
        by_remainder.sort_by(|&a, &b| {
            let remainder_a = exact[a] - rounded[a];
            let remainder_b = exact[b] - rounded[b];
            remainder_b.cmp(&remainder_a)
        });
        for position in by_remainder.into_iter().take(leftover) {
            rounded[position] = rounded[position]
                .checked_add(unit)
                .ok_or_else(|| SettleError::arithmetic_overflow("owed share"))?;
        }
    }

    Ok(rounded)
}
