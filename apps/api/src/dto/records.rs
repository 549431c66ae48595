use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stockroom_application::{FormInput, RecordTypeAccess};
use stockroom_domain::{
    FieldDefinition, ListOrdering, PermissionGrant, Record, RecordFields, RecordStatus,
};

/// Incoming record create or update payload.
#[derive(Debug, Deserialize)]
pub struct RecordRequest {
    pub data: FormInput,
}

/// API representation of a stored record.
#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub id: i64,
    pub record_type: String,
    pub fields: RecordFields,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Record> for RecordResponse {
    fn from(value: Record) -> Self {
        Self {
            id: value.id().value(),
            record_type: value.record_type().to_owned(),
            status: value.status(),
            created_at: value.created_at(),
            updated_at: value.updated_at(),
            fields: value.fields().clone(),
        }
    }
}

/// API representation of a record type and the caller's rights on it.
#[derive(Debug, Serialize)]
pub struct RecordTypeResponse {
    pub logical_name: String,
    pub display_name: String,
    pub table_name: String,
    pub fields: Vec<FieldDefinition>,
    pub ordering: ListOrdering,
    pub search_fields: Vec<String>,
    pub capabilities: PermissionGrant,
}

impl From<RecordTypeAccess> for RecordTypeResponse {
    fn from(value: RecordTypeAccess) -> Self {
        let record_type = value.record_type;
        Self {
            logical_name: record_type.logical_name().to_owned(),
            display_name: record_type.display_name().to_owned(),
            table_name: record_type.table_name().to_owned(),
            fields: record_type.fields().to_vec(),
            ordering: record_type.ordering(),
            search_fields: record_type.search_fields().to_vec(),
            capabilities: value.capabilities,
        }
    }
}
