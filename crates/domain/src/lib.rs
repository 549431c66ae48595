//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod catalog;
mod record;
mod schema;
mod security;
mod task;

pub use catalog::{CATEGORY, DOCTYPE, ITEM, MOVEMENT, UOM, stock_catalog};
pub use record::{
    FieldValue, Record, RecordFields, RecordId, RecordStatus, next_updated_at,
};
pub use schema::{
    FieldDefinition, FieldKind, ListOrdering, RESERVED_FIELD_NAMES, RecordType, RecordTypeCatalog,
};
pub use security::{AuditAction, Operation, PermissionGrant};
pub use task::{TASK_RESOURCE, Task, validate_task_text};
