use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use stockroom_application::{RecordScan, RecordStore};
use stockroom_core::{AppError, AppResult};
use stockroom_domain::{ListOrdering, Record, RecordFields, RecordId, RecordStatus};
use tokio::sync::RwLock;

/// In-memory record store, keyed by record type then identity.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    tables: RwLock<BTreeMap<String, Table>>,
}

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<RecordId, Record>,
}

impl InMemoryRecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn record_not_found(record_type: &str, id: RecordId) -> AppError {
    AppError::NotFound(format!("{record_type} {id} does not exist"))
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list(&self, record_type: &str, scan: &RecordScan) -> AppResult<Vec<Record>> {
        let tables = self.tables.read().await;
        let Some(table) = tables.get(record_type) else {
            return Ok(Vec::new());
        };

        let mut rows: Vec<&Record> = table
            .rows
            .values()
            .filter(|record| scan.matches(record))
            .collect();
        if scan.ordering == ListOrdering::Descending {
            rows.reverse();
        }

        Ok(rows
            .into_iter()
            .skip(scan.offset)
            .take(scan.limit)
            .cloned()
            .collect())
    }

    async fn get(&self, record_type: &str, id: RecordId) -> AppResult<Record> {
        self.tables
            .read()
            .await
            .get(record_type)
            .and_then(|table| table.rows.get(&id))
            .cloned()
            .ok_or_else(|| record_not_found(record_type, id))
    }

    async fn find_status(
        &self,
        record_type: &str,
        id: RecordId,
    ) -> AppResult<Option<RecordStatus>> {
        Ok(self
            .tables
            .read()
            .await
            .get(record_type)
            .and_then(|table| table.rows.get(&id))
            .map(Record::status))
    }

    async fn insert(
        &self,
        record_type: &str,
        fields: RecordFields,
        status: RecordStatus,
    ) -> AppResult<Record> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(record_type.to_owned()).or_default();

        let id = RecordId::new(table.last_id + 1)?;
        let record = Record::created(id, record_type, fields, status, Utc::now())?;
        table.last_id = id.value();
        table.rows.insert(id, record.clone());

        Ok(record)
    }

    async fn update(
        &self,
        record_type: &str,
        id: RecordId,
        fields: RecordFields,
        status: RecordStatus,
    ) -> AppResult<Record> {
        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(record_type)
            .and_then(|table| table.rows.get_mut(&id))
            .ok_or_else(|| record_not_found(record_type, id))?;

        *row = row.updated(fields, status, Utc::now());
        Ok(row.clone())
    }

    async fn delete(&self, record_type: &str, id: RecordId) -> AppResult<()> {
        self.tables
            .write()
            .await
            .get_mut(record_type)
            .and_then(|table| table.rows.remove(&id))
            .map(|_| ())
            .ok_or_else(|| record_not_found(record_type, id))
    }
}
