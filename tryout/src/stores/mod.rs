use async_trait::async_trait;
use futures::stream::BoxStream;
use metrics::counter;
use tracing::warn;

use crate::api::StoreError;
use crate::record::Record;

pub mod file;
pub mod memory;

/// Records in storage order. Each call to [`RecordStore::all`] produces a
/// fresh stream starting from the first record.
pub type RecordStream = BoxStream<'static, Result<Record, StoreError>>;

#[async_trait]
pub trait RecordStore {
    /// Add one record at the end of the store.
    async fn append(&self, record: &Record) -> Result<(), StoreError>;

    /// Every stored record, oldest first. Lines that do not parse are skipped.
    async fn all(&self) -> Result<RecordStream, StoreError>;
}

/// Parse one stored line. Blank lines are ignored, malformed ones are logged
/// and counted before being dropped.
pub(crate) fn parse_line(number: usize, line: &str) -> Option<Record> {
    if line.trim().is_empty() {
        return None;
    }

    match Record::from_line(line) {
        Ok(record) => Some(record),
        Err(err) => {
            warn!(line = number, "skipping stored record: {}", err);
            counter!("tryout_records_skipped_total").increment(1);
            None
        }
    }
}

/// Same as [`parse_line`] for a line read as raw bytes. Lines that are not
/// UTF-8 count as malformed.
pub(crate) fn parse_bytes(number: usize, line: &[u8]) -> Option<Record> {
    match std::str::from_utf8(line) {
        Ok(line) => parse_line(number, line),
        Err(err) => {
            warn!(line = number, "skipping stored record: {}", err);
            counter!("tryout_records_skipped_total").increment(1);
            None
        }
    }
}

pub(crate) fn report_store_error(err: &StoreError) {
    counter!("tryout_store_errors_total", "op" => err.as_str()).increment(1);
}
