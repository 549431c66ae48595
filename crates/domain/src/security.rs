use std::str::FromStr;

use serde::{Deserialize, Serialize};
use stockroom_core::AppError;

/// Operations gated by the role policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// List or read records.
    View,
    /// Create records.
    Add,
    /// Update records.
    Change,
    /// Delete records.
    Delete,
}

impl Operation {
    /// Returns a stable storage value for this operation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Add => "add",
            Self::Change => "change",
            Self::Delete => "delete",
        }
    }

    /// Returns all known operations.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Operation] = &[
            Operation::View,
            Operation::Add,
            Operation::Change,
            Operation::Delete,
        ];

        ALL
    }
}

impl FromStr for Operation {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "view" => Ok(Self::View),
            "add" => Ok(Self::Add),
            "change" => Ok(Self::Change),
            "delete" => Ok(Self::Delete),
            _ => Err(AppError::Validation(format!(
                "unknown operation value '{value}'"
            ))),
        }
    }
}

/// Static grant for one `(role, record type)` pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionGrant {
    /// Allows listing and reading.
    #[serde(default)]
    pub can_view: bool,
    /// Allows creating.
    #[serde(default)]
    pub can_add: bool,
    /// Allows updating.
    #[serde(default)]
    pub can_change: bool,
    /// Allows deleting.
    #[serde(default)]
    pub can_delete: bool,
}

impl PermissionGrant {
    /// Grants every operation.
    #[must_use]
    pub fn full() -> Self {
        Self {
            can_view: true,
            can_add: true,
            can_change: true,
            can_delete: true,
        }
    }

    /// Grants listing only.
    #[must_use]
    pub fn view_only() -> Self {
        Self {
            can_view: true,
            ..Self::default()
        }
    }

    /// Returns the flag for one operation.
    #[must_use]
    pub fn allows(&self, operation: Operation) -> bool {
        match operation {
            Operation::View => self.can_view,
            Operation::Add => self.can_add,
            Operation::Change => self.can_change,
            Operation::Delete => self.can_delete,
        }
    }
}

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a record is created.
    RecordCreated,
    /// Emitted when a record is updated.
    RecordUpdated,
    /// Emitted when a record is deleted.
    RecordDeleted,
    /// Emitted when a task is created.
    TaskCreated,
    /// Emitted when a task is updated.
    TaskUpdated,
    /// Emitted when a task is deleted.
    TaskDeleted,
    /// Emitted when a token pair is issued or refreshed.
    TokenIssued,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RecordCreated => "record.created",
            Self::RecordUpdated => "record.updated",
            Self::RecordDeleted => "record.deleted",
            Self::TaskCreated => "task.created",
            Self::TaskUpdated => "task.updated",
            Self::TaskDeleted => "task.deleted",
            Self::TokenIssued => "auth.token.issued",
        }
    }
}
