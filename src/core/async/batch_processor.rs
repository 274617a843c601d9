//! Concurrent settlement of independent groups
//!
//! This module provides the `BatchProcessor` struct, which settles many groups
//! at once. Groups share nothing, so each one is settled in its own tokio
//! task and the outcome is stored in a shared result map keyed by group id.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     ├── Arc<SettlementEngine>                              (stateless, shared)
//!     └── Arc<DashMap<GroupId, Result<GroupSettlement, _>>>  (per-group outcomes)
//! ```
//!
//! # Thread Safety
//!
//! The processor is cloneable and can be safely shared across async tasks.
//! The engine is immutable; the result map uses fine-grained sharded locking.

use std::sync::Arc;

use dashmap::DashMap;

use crate::core::engine::SettlementEngine;
use crate::core::ledger_book::GroupJob;
use crate::types::{GroupId, GroupSettlement, SettleError};

/// Outcome of settling one group
pub type GroupOutcome = Result<GroupSettlement, SettleError>;

/// Settles groups concurrently
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    /// Settlement engine shared by all tasks
    engine: Arc<SettlementEngine>,

    /// Outcome of every processed group
    results: Arc<DashMap<GroupId, GroupOutcome>>,
}

impl BatchProcessor {
    /// Create a new BatchProcessor with an empty result map
    pub fn new(engine: Arc<SettlementEngine>) -> Self {
        Self {
            engine,
            results: Arc::new(DashMap::new()),
        }
    }

    /// Settle a single group and record its outcome
    ///
    /// Failures are logged and stored; they never affect other groups.
    pub fn process_group(&self, job: GroupJob) {
        let outcome = self
            .engine
            .settle_records(&job.group, &job.roster, &job.records);

        if let Err(e) = &outcome {
            tracing::error!(group = %job.group, error = %e, "Failed to settle group");
        }

        self.results.insert(job.group, outcome);
    }

    /// Settle every job, one tokio task per group
    ///
    /// Waits until all tasks have finished. A panicking task is logged and its
    /// group is left without an outcome.
    pub async fn process_jobs(&self, jobs: Vec<GroupJob>) {
        let mut tasks = Vec::with_capacity(jobs.len());
        for job in jobs {
            let processor = self.clone();
            tasks.push(tokio::spawn(async move { processor.process_group(job) }));
        }

        for task in futures::future::join_all(tasks).await {
            if let Err(e) = task {
                tracing::error!(error = ?e, "Settlement task panicked");
            }
        }
    }

    /// Outcome recorded for a group, if it was processed
    pub fn outcome(&self, group: &str) -> Option<GroupOutcome> {
        self.results.get(group).map(|entry| entry.value().clone())
    }

    /// Number of groups processed so far
    pub fn processed(&self) -> usize {
        self.results.len()
    }

    /// Successful settlements sorted by group id
    pub fn settlements(&self) -> Vec<GroupSettlement> {
        let mut settled: Vec<GroupSettlement> = self
            .results
            .iter()
            .filter_map(|entry| entry.value().as_ref().ok().cloned())
            .collect();
        settled.sort_by(|a, b| a.group.cmp(&b.group));
        settled
    }
}
