//! Per-group ledger assembly
//!
//! Ledger files interleave records from many groups. `LedgerBook` collects
//! them per group (preserving file order within each group) and pairs them with
//! the group rosters into independent [`GroupJob`]s.

use crate::types::{GroupId, LedgerRecord, MemberId};
use std::collections::BTreeMap;

/// Ordered member list of every group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rosters {
    groups: BTreeMap<GroupId, Vec<MemberId>>,
}

impl Rosters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a member to a group's roster
    pub fn add(&mut self, group: impl Into<GroupId>, member: impl Into<MemberId>) {
        self.groups
            .entry(group.into())
            .or_default()
            .push(member.into());
    }

    /// Roster of a group; empty for unknown groups
    pub fn roster(&self, group: &str) -> &[MemberId] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Everything needed to settle one group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupJob {
    pub group: GroupId,
    pub roster: Vec<MemberId>,
    pub records: Vec<LedgerRecord>,
}

/// Ledger records grouped by group id
#[derive(Debug, Clone, Default)]
pub struct LedgerBook {
    groups: BTreeMap<GroupId, Vec<LedgerRecord>>,
}

impl LedgerBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to its group's ledger
    pub fn push(&mut self, record: LedgerRecord) {
        self.groups
            .entry(record.group.clone())
            .or_default()
            .push(record);
    }

    /// Records of a group in insertion order
    pub fn records(&self, group: &str) -> &[LedgerRecord] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or_default()
    }

    /// All records, grouped and sorted by group id
    pub fn iter(&self) -> impl Iterator<Item = &LedgerRecord> {
        self.groups.values().flatten()
    }

    /// Every group with its records, sorted by group id
    pub fn groups(&self) -> impl Iterator<Item = (&GroupId, &[LedgerRecord])> {
        self.groups
            .iter()
            .map(|(group, records)| (group, records.as_slice()))
    }

    /// Number of records across all groups
    pub fn record_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Pair every group with its roster
    ///
    /// Covers groups that appear in the ledger, the rosters, or both, sorted by
    /// group id. A ledger group without a roster gets an empty roster, so all
    /// of its references are treated as outside the group.
    pub fn into_jobs(self, rosters: &Rosters) -> Vec<GroupJob> {
        let mut groups = self.groups;
        for group in rosters.groups.keys() {
            groups.entry(group.clone()).or_default();
        }

        groups
            .into_iter()
            .map(|(group, records)| {
                let roster = rosters.roster(&group).to_vec();
                if roster.is_empty() {
                    tracing::warn!(group = %group, "Ledger group has no roster");
                }
                GroupJob {
                    group,
                    roster,
                    records,
                }
            })
            .collect()
    }
}

impl Extend<LedgerRecord> for LedgerBook {
    fn extend<T: IntoIterator<Item = LedgerRecord>>(&mut self, iter: T) {
        for record in iter {
            self.push(record);
        }
    }
}

impl FromIterator<LedgerRecord> for LedgerBook {
    fn from_iter<T: IntoIterator<Item = LedgerRecord>>(iter: T) -> Self {
        let mut book = LedgerBook::new();
        book.extend(iter);
        book
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LedgerEntry;
    use rust_decimal::Decimal;

    fn payment(group: &str, amount: i64) -> LedgerRecord {
        LedgerRecord::new(group, LedgerEntry::payment(Decimal::new(amount, 0), "A", "B"))
    }

    #[test]
    fn test_records_keep_insertion_order_per_group() {
        let book: LedgerBook = vec![payment("g1", 1), payment("g2", 2), payment("g1", 3)]
            .into_iter()
            .collect();

        let amounts: Vec<Decimal> = book.records("g1").iter().map(|r| r.entry.amount()).collect();
        assert_eq!(amounts, vec![Decimal::new(1, 0), Decimal::new(3, 0)]);
        assert_eq!(book.records("g2").len(), 1);
        assert!(book.records("missing").is_empty());
        assert_eq!(book.record_count(), 3);

        let groups: Vec<&str> = book.groups().map(|(group, _)| group.as_str()).collect();
        assert_eq!(groups, vec!["g1", "g2"]);
    }

    #[test]
    fn test_rosters_preserve_member_order() {
        let mut rosters = Rosters::new();
        rosters.add("g1", "C");
        rosters.add("g1", "A");
        rosters.add("g2", "B");

        assert_eq!(rosters.roster("g1"), &["C".to_string(), "A".to_string()]);
        assert!(rosters.roster("g3").is_empty());
        assert_eq!(rosters.len(), 2);
    }

    #[test]
    fn test_groups_are_the_ledger_groups_only() {
        let book: LedgerBook = vec![payment("b", 1), payment("b", 2)].into_iter().collect();
        let mut rosters = Rosters::new();
        rosters.add("a", "A");
        rosters.add("b", "B");
        rosters.add("c", "C");

        assert_eq!(book.groups().count(), 1);
        assert_eq!(rosters.len(), 3);
    }

    #[test]
    fn test_into_jobs_covers_ledger_and_roster_groups() {
        let book: LedgerBook = vec![payment("b", 1), payment("c", 2)].into_iter().collect();
        let mut rosters = Rosters::new();
        rosters.add("a", "A");
        rosters.add("b", "A");
        rosters.add("b", "B");

        let jobs = book.into_jobs(&rosters);

        let groups: Vec<&str> = jobs.iter().map(|job| job.group.as_str()).collect();
        assert_eq!(groups, vec!["a", "b", "c"]);
        assert!(jobs[0].records.is_empty());
        assert_eq!(jobs[1].roster.len(), 2);
        assert_eq!(jobs[1].records.len(), 1);
        assert!(jobs[2].roster.is_empty());
    }
}
