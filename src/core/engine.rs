//! Group settlement engine
//!
//! This module provides the SettlementEngine that runs the balance engine and
//! the settlement planner in sequence for one group:
//!
//! ```text
//! ledger entries ──► BalanceEngine ──► BalanceSheet ──► SettlementPlanner ──► transfers
//! ```
//!
//! The engine holds no state besides its configuration. A single instance can
//! be shared between threads and used for any number of groups.

use crate::core::balance_engine::BalanceEngine;
use crate::core::config::SettlementConfig;
use crate::core::planner::SettlementPlanner;
use crate::types::{GroupId, GroupSettlement, LedgerEntry, LedgerRecord, MemberId, SettleError};

/// Computes balances and a settlement plan for a group
#[derive(Debug, Clone, Default)]
pub struct SettlementEngine {
    balances: BalanceEngine,
    planner: SettlementPlanner,
}

impl SettlementEngine {
    /// Create a new SettlementEngine
    ///
    /// Both stages share the same tolerance, currency unit and ordering.
    pub fn new(config: SettlementConfig) -> Self {
        SettlementEngine {
            balances: BalanceEngine::new(config.clone()),
            planner: SettlementPlanner::new(config),
        }
    }

    pub fn config(&self) -> &SettlementConfig {
        self.balances.config()
    }

    /// Settle one group from its roster and raw entries
    ///
    /// # Errors
    ///
    /// Returns the first error raised by either stage; see
    /// [`BalanceEngine::compute`] and [`SettlementPlanner::plan`].
    pub fn settle<'a, I>(
        &self,
        group: &str,
        roster: &[MemberId],
        entries: I,
    ) -> Result<GroupSettlement, SettleError>
    where
        I: IntoIterator<Item = &'a LedgerEntry>,
    {
        let balances = self.balances.compute(roster, entries)?;
        let settlements = self.planner.plan(&balances)?;

        tracing::debug!(
            group,
            members = balances.len(),
            transfers = settlements.len(),
            "Settled group"
        );

        Ok(GroupSettlement {
            group: GroupId::from(group),
            balances,
            settlements,
        })
    }

    /// Settle one group from ledger records (metadata is ignored)
    pub fn settle_records(
        &self,
        group: &str,
        roster: &[MemberId],
        records: &[LedgerRecord],
    ) -> Result<GroupSettlement, SettleError> {
        self.settle(group, roster, records.iter().map(|record| &record.entry))
    }
}
