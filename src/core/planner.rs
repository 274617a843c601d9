//! Settlement planning
//!
//! Turns a balance sheet into an ordered list of transfers that brings every
//! member back to zero (within tolerance).
//!
//! # Algorithm
//!
//! Greedy matching over two work queues:
//!
//! 1. Members with a negative balance become debtors, members with a positive
//!    balance become creditors, both in a stable order (roster order, or
//!    largest magnitude first with ties in roster order)
//! 2. The front debtor pays the front creditor `min(|debt|, credit)`
//! 3. A party leaves its queue once its residual reaches zero
//! 4. Planning ends when a queue is empty; whatever is left in the other one
//!    must be within tolerance
//!
//! Money is fixed-point, so a zero-sum sheet always settles exactly. The
//! tolerance only absorbs an imbalance between total debt and total credit;
//! it never excludes a member. Three members at `+0.02, -0.01, -0.01` still
//! get their two one-cent transfers.
//!
//! This is not globally transfer-minimal (that is a combinatorial matching
//! problem). The greedy pass is deterministic and linear in the number of
//! parties, and emits at most `debtors + creditors - 1` transfers.

use crate::core::config::{PartyOrder, SettlementConfig};
use crate::types::{BalanceSheet, SettleError, Settlement};
use rust_decimal::Decimal;
use std::collections::VecDeque;

/// A member with an outstanding debt or credit
///
/// `member` indexes into the balance sheet; `residual` is the magnitude still
/// to be settled.
#[derive(Debug, Clone, Copy)]
struct Party {
    member: usize,
    residual: Decimal,
}

/// Plans settling transfers from a balance sheet
#[derive(Debug, Clone, Default)]
pub struct SettlementPlanner {
    config: SettlementConfig,
}

impl SettlementPlanner {
    pub fn new(config: SettlementConfig) -> Self {
        SettlementPlanner { config }
    }

    /// Produce the ordered transfer list for a balance sheet
    ///
    /// The sheet itself is never modified. Identical sheets always yield
    /// identical plans.
    ///
    /// # Errors
    ///
    /// Returns `ImbalanceInconsistency` if total debt and total credit differ
    /// by more than the tolerance, or if more than the tolerance is left
    /// unsettled.
    /// Returns `ArithmeticOverflow` if the debt or credit total does not fit in
    /// a `Decimal`.
    pub fn plan(&self, sheet: &BalanceSheet) -> Result<Vec<Settlement>, SettleError> {
        let (mut debtors, mut creditors) = self.partition(sheet);

        let total_debt = total_residual(&debtors, "total debt")?;
        let total_credit = total_residual(&creditors, "total credit")?;
        if !self.config.is_negligible(total_credit - total_debt) {
            return Err(SettleError::imbalance(
                "debtor and creditor totals",
                total_credit - total_debt,
            ));
        }

        let balances = sheet.balances();
        let mut settlements = Vec::with_capacity(debtors.len() + creditors.len());

        while let (Some(debtor), Some(creditor)) = (debtors.front_mut(), creditors.front_mut()) {
            let amount = debtor.residual.min(creditor.residual);

            settlements.push(Settlement {
                from: balances[debtor.member].member.clone(),
                to: balances[creditor.member].member.clone(),
                amount,
            });

            debtor.residual -= amount;
            creditor.residual -= amount;

            if debtor.residual.is_zero() {
                debtors.pop_front();
            }
            if creditor.residual.is_zero() {
                creditors.pop_front();
            }
        }

        // Matching stops once one queue is empty, so at most one holds leftovers
        let unsettled = total_residual(&debtors, "unsettled debt")?
            .max(total_residual(&creditors, "unsettled credit")?);
        if !self.config.is_negligible(unsettled) {
            return Err(SettleError::imbalance("settlement plan", unsettled));
        }

        tracing::debug!(transfers = settlements.len(), "Planned settlements");

        Ok(settlements)
    }

    /// Split the sheet into debtor and creditor queues in planning order
    fn partition(&self, sheet: &BalanceSheet) -> (VecDeque<Party>, VecDeque<Party>) {
        let mut debtors = Vec::new();
        let mut creditors = Vec::new();

        for (member, balance) in sheet.balances().iter().enumerate() {
            if balance.net.is_zero() {
                continue;
            }
            let party = Party {
                member,
                residual: balance.net.abs(),
            };
            if balance.net.is_sign_negative() {
                debtors.push(party);
            } else {
                creditors.push(party);
            }
        }

        if self.config.order == PartyOrder::LargestFirst {
            // Stable sort: equal magnitudes keep roster order
            debtors.sort_by(|a, b| b.residual.cmp(&a.residual));
            creditors.sort_by(|a, b| b.residual.cmp(&a.residual));
        }

        (debtors.into(), creditors.into())
    }
}

/// Sum of the residuals in a queue, failing instead of overflowing
fn total_residual(parties: &VecDeque<Party>, operation: &str) -> Result<Decimal, SettleError> {
    parties
        .iter()
        .try_fold(Decimal::ZERO, |total, party| total.checked_add(party.residual))
        .ok_or_else(|| SettleError::arithmetic_overflow(operation))
}
