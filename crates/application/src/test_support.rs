use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use stockroom_core::{AppError, AppResult};
use stockroom_domain::{ListOrdering, Record, RecordFields, RecordId, RecordStatus};
use tokio::sync::Mutex;

use crate::{RecordScan, RecordStore};

#[derive(Default)]
pub(crate) struct FakeRecordStore {
    records: Mutex<BTreeMap<(String, i64), Record>>,
    next_ids: Mutex<BTreeMap<String, i64>>,
}

#[async_trait]
impl RecordStore for FakeRecordStore {
    async fn list(&self, record_type: &str, scan: &RecordScan) -> AppResult<Vec<Record>> {
        let mut listed: Vec<Record> = self
            .records
            .lock()
            .await
            .values()
            .filter(|record| record.record_type() == record_type && scan.matches(record))
            .cloned()
            .collect();
        if scan.ordering == ListOrdering::Descending {
            listed.reverse();
        }
        Ok(listed
            .into_iter()
            .skip(scan.offset)
            .take(scan.limit)
            .collect())
    }

    async fn get(&self, record_type: &str, id: RecordId) -> AppResult<Record> {
        self.records
            .lock()
            .await
            .get(&(record_type.to_owned(), id.value()))
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("{record_type} {id}")))
    }

    async fn find_status(
        &self,
        record_type: &str,
        id: RecordId,
    ) -> AppResult<Option<RecordStatus>> {
        Ok(self
            .records
            .lock()
            .await
            .get(&(record_type.to_owned(), id.value()))
            .map(Record::status))
    }

    async fn insert(
        &self,
        record_type: &str,
        fields: RecordFields,
        status: RecordStatus,
    ) -> AppResult<Record> {
        let mut next_ids = self.next_ids.lock().await;
        let next = next_ids.entry(record_type.to_owned()).or_insert(0);
        *next += 1;

        let id = RecordId::new(*next)?;
        let record = Record::created(id, record_type, fields, status, Utc::now())?;
        self.records
            .lock()
            .await
            .insert((record_type.to_owned(), *next), record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        record_type: &str,
        id: RecordId,
        fields: RecordFields,
        status: RecordStatus,
    ) -> AppResult<Record> {
        let mut records = self.records.lock().await;
        let key = (record_type.to_owned(), id.value());
        let existing = records
            .get(&key)
            .ok_or_else(|| AppError::NotFound(format!("{record_type} {id}")))?;
        let updated = existing.updated(fields, status, Utc::now());
        records.insert(key, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, record_type: &str, id: RecordId) -> AppResult<()> {
        self.records
            .lock()
            .await
            .remove(&(record_type.to_owned(), id.value()))
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("{record_type} {id}")))
    }
}
