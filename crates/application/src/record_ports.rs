use async_trait::async_trait;
use stockroom_core::AppResult;
use stockroom_domain::{FieldValue, ListOrdering, Record, RecordFields, RecordId, RecordStatus};

/// Rows returned when a list query names no limit.
pub const DEFAULT_RECORD_LIST_LIMIT: usize = 100;
/// Largest page a list query may request.
pub const MAX_RECORD_LIST_LIMIT: usize = 500;

/// Caller-supplied narrowing for a record list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordListQuery {
    /// Only records in this status.
    pub status: Option<RecordStatus>,
    /// Case-insensitive text matched against the type's search fields.
    pub search: Option<String>,
    /// Maximum rows returned.
    pub limit: usize,
    /// Number of rows skipped for offset pagination.
    pub offset: usize,
}

impl Default for RecordListQuery {
    fn default() -> Self {
        Self {
            status: None,
            search: None,
            limit: DEFAULT_RECORD_LIST_LIMIT,
            offset: 0,
        }
    }
}

/// Text search resolved against a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSearch {
    /// Trimmed, non-empty search text.
    pub text: String,
    /// Fields whose values are matched.
    pub fields: Vec<String>,
}

/// Fully resolved list request handed to a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordScan {
    /// Identity order of the result.
    pub ordering: ListOrdering,
    /// Only records in this status.
    pub status: Option<RecordStatus>,
    /// Optional text search.
    pub search: Option<RecordSearch>,
    /// Maximum rows returned.
    pub limit: usize,
    /// Rows skipped after filtering and ordering.
    pub offset: usize,
}

impl RecordScan {
    /// Scan over every record of a type in the given order.
    #[must_use]
    pub fn all(ordering: ListOrdering) -> Self {
        Self {
            ordering,
            status: None,
            search: None,
            limit: usize::MAX,
            offset: 0,
        }
    }

    /// Returns whether a record passes the status filter and text search.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        if self.status.is_some_and(|status| status != record.status()) {
            return false;
        }

        let Some(search) = &self.search else {
            return true;
        };
        let needle = search.text.to_lowercase();
        search.fields.iter().any(|name| {
            let haystack = match record.field(name) {
                Some(FieldValue::Text(text)) => text.to_lowercase(),
                Some(FieldValue::Integer(number)) => number.to_string(),
                Some(FieldValue::Null) | None => return false,
            };
            haystack.contains(needle.as_str())
        })
    }
}

/// Repository port for generic record persistence.
///
/// Adapters provide single-row atomicity only. Foreign-key references are
/// never cleared or cascaded by a store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Lists records of a type that match the scan, ordered by identity
    /// and paged after filtering.
    async fn list(&self, record_type: &str, scan: &RecordScan) -> AppResult<Vec<Record>>;

    /// Loads one record or fails with `NotFound`.
    async fn get(&self, record_type: &str, id: RecordId) -> AppResult<Record>;

    /// Returns the status of a record when it exists.
    async fn find_status(
        &self,
        record_type: &str,
        id: RecordId,
    ) -> AppResult<Option<RecordStatus>>;

    /// Assigns the next identity and stores a record with both timestamps set to now.
    async fn insert(
        &self,
        record_type: &str,
        fields: RecordFields,
        status: RecordStatus,
    ) -> AppResult<Record>;

    /// Replaces field values and status, advancing `updated_at` only.
    async fn update(
        &self,
        record_type: &str,
        id: RecordId,
        fields: RecordFields,
        status: RecordStatus,
    ) -> AppResult<Record>;

    /// Physically removes a record or fails with `NotFound`.
    async fn delete(&self, record_type: &str, id: RecordId) -> AppResult<()>;
}
