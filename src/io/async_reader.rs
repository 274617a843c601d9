//! Asynchronous ledger reader with batch interface
//!
//! Provides a streaming interface over ledger records from a CSV file.
//! Supports batch reading for efficient async processing.
//!
//! # Design
//!
//! The AsyncReader uses:
//! - csv-async for streaming CSV parsing
//! - futures streams to pull records one batch at a time
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of LedgerRecords
//!                  ↓
//!           csv_format module
//!           (CsvLedgerRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvLedgerRecord};
use crate::types::LedgerRecord;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Asynchronous ledger CSV reader
///
/// Keeps memory bounded by the batch size; the caller decides what to
/// retain from each batch.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 0,
        }
    }

    /// Read a batch of ledger records
    ///
    /// Reads up to `batch_size` rows, converting them to LedgerRecords.
    /// Malformed rows are logged with their line number and skipped.
    ///
    /// Returns an empty vector when the end of the file is reached.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<LedgerRecord> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvLedgerRecord>();

        while batch.len() < batch_size {
            let Some(next) = records.next().await else {
                break;
            };
            self.line_num += 1;
            let line = self.line_num + 1;

            match next {
                Ok(csv_record) => match convert_csv_record(csv_record) {
                    Ok(record) => batch.push(record),
                    Err(e) => tracing::warn!(line, error = %e, "Skipping ledger record"),
                },
                Err(e) => tracing::warn!(line, error = %e, "CSV parse error"),
            }
        }

        batch
    }
}
