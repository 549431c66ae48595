use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use stockroom_application::{RecordScan, RecordStore};
use stockroom_core::{AppError, AppResult};
use stockroom_domain::{ListOrdering, Record, RecordFields, RecordId, RecordStatus};


/// PostgreSQL-backed record store.
///
/// All record types share `stock_records`; identities come from a per-type
/// counter row in `record_sequences` and are never reused.
#[derive(Clone)]
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    /// Creates a store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RecordRow {
    record_type: String,
    id: i64,
    fields: Value,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn record_from_row(row: RecordRow) -> AppResult<Record> {
    let fields: RecordFields = serde_json::from_value(row.fields).map_err(|error| {
        AppError::Internal(format!(
            "stored fields for {} {} are malformed: {error}",
            row.record_type, row.id
        ))
    })?;
    let status = RecordStatus::from_str(row.status.as_str())
        .map_err(|error| AppError::Internal(format!("stored status is invalid: {error}")))?;

    Record::restore(
        RecordId::new(row.id)?,
        row.record_type,
        fields,
        status,
        row.created_at,
        row.updated_at,
    )
}

fn fields_to_json(fields: &RecordFields) -> AppResult<Value> {
    serde_json::to_value(fields)
        .map_err(|error| AppError::Internal(format!("failed to encode record fields: {error}")))
}

// Search matches when any listed field's text rendering contains the
// search text, ignoring case.
fn list_sql(direction: &str) -> String {
    format!(
        r#"
        SELECT record_type, id, fields, status, created_at, updated_at
        FROM stock_records
        WHERE record_type = $1
          AND ($2::TEXT IS NULL OR status = $2)
          AND ($3::TEXT IS NULL OR EXISTS (
              SELECT 1
              FROM unnest($4::TEXT[]) AS search_field(name)
              WHERE strpos(lower(fields ->> search_field.name), lower($3)) > 0
          ))
        ORDER BY id {direction}
        LIMIT $5 OFFSET $6
        "#
    )
}

fn record_not_found(record_type: &str, id: RecordId) -> AppError {
    AppError::NotFound(format!("{record_type} {id} does not exist"))
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn list(&self, record_type: &str, scan: &RecordScan) -> AppResult<Vec<Record>> {
        let sql = match scan.ordering {
            ListOrdering::Ascending => list_sql("ASC"),
            ListOrdering::Descending => list_sql("DESC"),
        };
        let (search_text, search_fields) = match &scan.search {
            Some(search) => (Some(search.text.as_str()), search.fields.clone()),
            None => (None, Vec::new()),
        };

        let rows = sqlx::query_as::<_, RecordRow>(sql.as_str())
            .bind(record_type)
            .bind(scan.status.map(|status| status.as_str()))
            .bind(search_text)
            .bind(search_fields)
            .bind(i64::try_from(scan.limit).unwrap_or(i64::MAX))
            .bind(i64::try_from(scan.offset).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to list records for type '{record_type}': {error}"
                ))
            })?;

        rows.into_iter().map(record_from_row).collect()
    }

    async fn get(&self, record_type: &str, id: RecordId) -> AppResult<Record> {
        let row = sqlx::query_as::<_, RecordRow>(
            r#"
            SELECT record_type, id, fields, status, created_at, updated_at
            FROM stock_records
            WHERE record_type = $1 AND id = $2
            "#,
        )
        .bind(record_type)
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load {record_type} {id}: {error}"))
        })?
        .ok_or_else(|| record_not_found(record_type, id))?;

        record_from_row(row)
    }

    async fn find_status(
        &self,
        record_type: &str,
        id: RecordId,
    ) -> AppResult<Option<RecordStatus>> {
        let status = sqlx::query_scalar::<_, String>(
            r#"
            SELECT status
            FROM stock_records
            WHERE record_type = $1 AND id = $2
            "#,
        )
        .bind(record_type)
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to look up status of {record_type} {id}: {error}"
            ))
        })?;

        status
            .map(|status| {
                RecordStatus::from_str(status.as_str()).map_err(|error| {
                    AppError::Internal(format!("stored status is invalid: {error}"))
                })
            })
            .transpose()
    }

    async fn insert(
        &self,
        record_type: &str,
        fields: RecordFields,
        status: RecordStatus,
    ) -> AppResult<Record> {
        let fields = fields_to_json(&fields)?;

        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to start insert transaction for type '{record_type}': {error}"
            ))
        })?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO record_sequences (record_type, last_id)
            VALUES ($1, 1)
            ON CONFLICT (record_type)
            DO UPDATE SET last_id = record_sequences.last_id + 1
            RETURNING last_id
            "#,
        )
        .bind(record_type)
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to allocate identity for type '{record_type}': {error}"
            ))
        })?;

        let row = sqlx::query_as::<_, RecordRow>(
            r#"
            INSERT INTO stock_records (record_type, id, fields, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, now(), now())
            RETURNING record_type, id, fields, status, created_at, updated_at
            "#,
        )
        .bind(record_type)
        .bind(id)
        .bind(&fields)
        .bind(status.as_str())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to insert record for type '{record_type}': {error}"
            ))
        })?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to commit insert transaction for type '{record_type}': {error}"
            ))
        })?;

        record_from_row(row)
    }

    async fn update(
        &self,
        record_type: &str,
        id: RecordId,
        fields: RecordFields,
        status: RecordStatus,
    ) -> AppResult<Record> {
        let fields = fields_to_json(&fields)?;

        let row = sqlx::query_as::<_, RecordRow>(
            r#"
            UPDATE stock_records
            SET fields = $3,
                status = $4,
                updated_at = GREATEST(clock_timestamp(), updated_at + interval '1 microsecond')
            WHERE record_type = $1 AND id = $2
            RETURNING record_type, id, fields, status, created_at, updated_at
            "#,
        )
        .bind(record_type)
        .bind(id.value())
        .bind(&fields)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to update {record_type} {id}: {error}"))
        })?
        .ok_or_else(|| record_not_found(record_type, id))?;

        record_from_row(row)
    }

    async fn delete(&self, record_type: &str, id: RecordId) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM stock_records
            WHERE record_type = $1 AND id = $2
            "#,
        )
        .bind(record_type)
        .bind(id.value())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete {record_type} {id}: {error}"))
        })?;

        if result.rows_affected() == 0 {
            return Err(record_not_found(record_type, id));
        }

        Ok(())
    }
}
