use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use crate::api::StoreError;
use crate::record::Record;
use crate::stores::{parse_line, RecordStore, RecordStream};

/// Keeps serialized lines in memory, the same text a [`super::file::FileStore`]
/// would write. Clones share the same lines.
#[derive(Clone, Default)]
pub struct MemoryStore {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryStore {
    pub fn with_lines(lines: Vec<String>) -> Self {
        MemoryStore {
            lines: Arc::new(Mutex::new(lines)),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn append(&self, record: &Record) -> Result<(), StoreError> {
        let line = record.to_line();
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
        Ok(())
    }

    async fn all(&self) -> Result<RecordStream, StoreError> {
        let snapshot = self.lines();
        let records = snapshot
            .into_iter()
            .enumerate()
            .filter_map(|(index, line)| parse_line(index + 1, &line))
            .map(Ok);

        Ok(stream::iter(records).boxed())
    }
}
