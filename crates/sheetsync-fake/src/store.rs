use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::RecordError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub id: u64,
    pub row_data: String,
}

/// Spring-style page body returned by `GET /data`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBody {
    pub content: Vec<StoredRecord>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number: usize,
    pub size: usize,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    records: Vec<StoredRecord>,
}

/// In-memory record set shared between the HTTP handler and test code.
#[derive(Clone, Default)]
pub struct RecordStore {
    inner: Arc<Mutex<Inner>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, row: Map<String, Value>) -> u64 {
        self.insert_raw(Value::Object(row).to_string())
    }

    /// Stores `row_data` exactly as given, even when it is not valid JSON.
    pub fn insert_raw(&self, row_data: impl Into<String>) -> u64 {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.records.push(StoredRecord {
            id,
            row_data: row_data.into(),
        });
        id
    }

    pub fn insert_many(&self, rows: Vec<Map<String, Value>>) -> Vec<u64> {
        rows.into_iter().map(|row| self.insert(row)).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ids(&self) -> Vec<u64> {
        self.lock().records.iter().map(|r| r.id).collect()
    }

    pub fn page(&self, page: usize, size: usize) -> Result<PageBody, RecordError> {
        if size == 0 {
            return Err(RecordError::BadRequest(
                "page size must not be less than one".into(),
            ));
        }
        let inner = self.lock();
        let total = inner.records.len() as u64;
        let content = inner
            .records
            .iter()
            .skip(page.saturating_mul(size))
            .take(size)
            .cloned()
            .collect();

        Ok(PageBody {
            content,
            total_elements: total,
            total_pages: total.div_ceil(size as u64),
            number: page,
            size,
        })
    }

    pub fn delete(&self, id: &str) -> Result<(), RecordError> {
        let mut inner = self.lock();
        let position = id
            .parse::<u64>()
            .ok()
            .and_then(|id| inner.records.iter().position(|r| r.id == id))
            .ok_or_else(|| RecordError::NotFound(id.to_string()))?;
        inner.records.remove(position);
        Ok(())
    }
}
