//! Asynchronous batch processing strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of the
//! ProcessingStrategy trait. The ledger is read in batches; once it is
//! complete, independent groups are settled in parallel.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_groups)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── LedgerBook (records grouped per group)
//!     └── BatchProcessor (one task per group)
//!         └── SettlementEngine (stateless, shared)
//! ```
//!
//! # Parallelism
//!
//! - Reading is sequential, so every group sees its entries in file order
//! - Groups share no state, so they are settled concurrently, at most
//!   `max_concurrent_groups` at a time
//! - Report order does not depend on task scheduling: output is sorted by group

use crate::core::r#async::BatchProcessor;
use crate::core::{GroupJob, LedgerBook, SettlementEngine};
use crate::io::async_reader::AsyncReader;
use crate::io::roster_reader::read_rosters_from;
use crate::strategy::{write_ledger_report, write_settlement_report, ProcessingStrategy, ReportOptions};
use crate::types::SettleError;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Configuration for batch processing
///
/// Controls how many ledger records are read per batch and how many groups
/// are settled at once.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchConfig {
    /// Number of ledger records per read batch
    pub batch_size: usize,
    /// Maximum number of groups settling concurrently
    pub max_concurrent_groups: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_groups: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values are replaced by the defaults.
    pub fn new(batch_size: usize, max_concurrent_groups: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                batch_size,
                default = default.batch_size,
                "Invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_groups = if max_concurrent_groups == 0 {
            tracing::warn!(
                max_concurrent_groups,
                default = default.max_concurrent_groups,
                "Invalid max_concurrent_groups, using default"
            );
            default.max_concurrent_groups
        } else {
            max_concurrent_groups
        };

        Self {
            batch_size,
            max_concurrent_groups,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// Produces the same report as [`SyncProcessingStrategy`](super::SyncProcessingStrategy)
/// for the same input.
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    /// Batch processing configuration
    config: BatchConfig,
    options: ReportOptions,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy with the specified configuration
    pub fn new(config: BatchConfig, options: ReportOptions) -> Self {
        Self { config, options }
    }

    async fn read_ledger(&self, ledger_path: &Path) -> Result<LedgerBook, String> {
        let file = tokio::fs::File::open(ledger_path)
            .await
            .map_err(|e| format!("Failed to open file '{}': {}", ledger_path.display(), e))?;

        // Wrap tokio file in a compatibility layer for csv-async
        let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
        let mut reader = AsyncReader::new(compat_file);

        let mut book = LedgerBook::new();
        loop {
            let batch = reader.read_batch(self.config.batch_size).await;
            if batch.is_empty() {
                break;
            }
            book.extend(batch);
        }

        Ok(book)
    }

    async fn settle(&self, jobs: Vec<GroupJob>) -> BatchProcessor {
        let engine = Arc::new(SettlementEngine::new(self.options.settlement.clone()));
        let processor = BatchProcessor::new(engine);

        let mut jobs = jobs.into_iter().peekable();
        while jobs.peek().is_some() {
            let wave: Vec<GroupJob> = jobs
                .by_ref()
                .take(self.config.max_concurrent_groups)
                .collect();
            processor.process_jobs(wave).await;
        }

        processor
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Settle every group in the ledger and write the report
    ///
    /// 1. Creates a tokio multi-threaded runtime
    /// 2. Loads the rosters
    /// 3. Reads the ledger in batches into a LedgerBook
    /// 4. Settles groups in waves of at most `max_concurrent_groups` tasks
    /// 5. Writes the selected report, sorted by group
    fn process(
        &self,
        ledger_path: &Path,
        roster_path: &Path,
        output: &mut dyn Write,
    ) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_groups)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        runtime.block_on(async {
            let roster_bytes = tokio::fs::read(roster_path)
                .await
                .map_err(|e| SettleError::file_error(roster_path, e).to_string())?;
            let rosters = read_rosters_from(roster_bytes.as_slice()).map_err(|e| e.to_string())?;

            let book = self.read_ledger(ledger_path).await?;
            tracing::info!(
                records = book.record_count(),
                groups = book.groups().count(),
                "Ledger loaded"
            );

            if !self.options.report.needs_settlement() {
                return write_ledger_report(&self.options, &book, output);
            }

            let processor = self.settle(book.into_jobs(&rosters)).await;
            tracing::info!(groups = processor.processed(), "Groups processed");

            write_settlement_report(&self.options, &processor.settlements(), output)
        })
    }
}
