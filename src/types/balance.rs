//! Derived balance and settlement types
//!
//! Everything in this module is a projection of the ledger. Nothing here is
//! ever stored; it is recomputed from scratch whenever the ledger or the
//! roster changes.

use super::entry::{GroupId, MemberId};
use rust_decimal::Decimal;

/// Balance figures for one roster member
#[derive(Debug, Clone, PartialEq)]
pub struct MemberBalance {
    pub member: MemberId,

    /// Expenses fronted, minus payments made, plus payments received
    pub contributed: Decimal,

    /// Equal-split shares of expenses, rounded once to the currency unit
    pub owed: Decimal,

    /// `contributed - owed`
    ///
    /// Positive means the member is owed money, negative means the member owes.
    pub net: Decimal,
}

/// A reference to an identifier outside the roster that was ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedReference {
    /// Position of the entry in the group's ledger
    pub entry: usize,

    /// The unknown identifier
    pub member: MemberId,
}

/// Net balance of every roster member, in roster order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BalanceSheet {
    balances: Vec<MemberBalance>,
    skipped: Vec<SkippedReference>,
}

impl BalanceSheet {
    pub fn new(balances: Vec<MemberBalance>, skipped: Vec<SkippedReference>) -> Self {
        BalanceSheet { balances, skipped }
    }

    /// All member balances in roster order (zero balances included)
    pub fn balances(&self) -> &[MemberBalance] {
        &self.balances
    }

    /// References to identifiers outside the roster that were ignored
    pub fn skipped(&self) -> &[SkippedReference] {
        &self.skipped
    }

    /// Net balance of a member, or `None` if the member is not on the roster
    pub fn net(&self, member: &str) -> Option<Decimal> {
        self.balances
            .iter()
            .find(|balance| balance.member == member)
            .map(|balance| balance.net)
    }

    /// Sum of all net balances; zero for a consistent ledger
    ///
    /// `None` if the sum does not fit in a `Decimal`.
    pub fn total(&self) -> Option<Decimal> {
        self.balances
            .iter()
            .try_fold(Decimal::ZERO, |total, balance| total.checked_add(balance.net))
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

/// A transfer instruction: `from` should pay `to` the given amount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub from: MemberId,
    pub to: MemberId,

    /// Always strictly positive
    pub amount: Decimal,
}

/// Balances and settlement plan for one group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSettlement {
    pub group: GroupId,
    pub balances: BalanceSheet,
    pub settlements: Vec<Settlement>,
}
