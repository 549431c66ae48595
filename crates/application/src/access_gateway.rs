use std::sync::Arc;

use serde::Serialize;
use stockroom_core::{AppError, AppResult, Caller};
use stockroom_domain::{
    AuditAction, Operation, PermissionGrant, Record, RecordId, RecordType, RecordTypeCatalog,
};
use tracing::info;

use crate::form_validator::{FormInput, FormValidator, ValidationResult};
use crate::{RecordStore, RolePolicy};

mod records_read;
mod records_write;


/// A catalog entry paired with what the caller may do on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordTypeAccess {
    /// Record type definition.
    pub record_type: RecordType,
    /// Effective grant of the caller on this type.
    pub capabilities: PermissionGrant,
}

/// Permission-gated list/get/add/update/delete over catalog record types.
#[derive(Clone)]
pub struct AccessGateway {
    catalog: Arc<RecordTypeCatalog>,
    store: Arc<dyn RecordStore>,
    policy: Arc<RolePolicy>,
    validator: FormValidator,
}

impl AccessGateway {
    /// Creates a gateway over a catalog, store and role policy.
    #[must_use]
    pub fn new(
        catalog: Arc<RecordTypeCatalog>,
        store: Arc<dyn RecordStore>,
        policy: Arc<RolePolicy>,
    ) -> Self {
        let validator = FormValidator::new(store.clone());
        Self {
            catalog,
            store,
            policy,
            validator,
        }
    }

    /// Returns the catalog this gateway serves.
    #[must_use]
    pub fn catalog(&self) -> &RecordTypeCatalog {
        &self.catalog
    }

    /// Returns the effective grant of a caller on a record type.
    pub fn capabilities(&self, caller: &Caller, record_type: &str) -> AppResult<PermissionGrant> {
        let record_type = self.catalog.require(record_type)?;
        Ok(self
            .policy
            .capabilities(caller, record_type.logical_name()))
    }

    /// Lists the record types the caller may view, with their capabilities.
    #[must_use]
    pub fn record_types(&self, caller: &Caller) -> Vec<RecordTypeAccess> {
        self.catalog
            .record_types()
            .iter()
            .map(|record_type| RecordTypeAccess {
                record_type: record_type.clone(),
                capabilities: self.policy.capabilities(caller, record_type.logical_name()),
            })
            .filter(|access| access.capabilities.can_view)
            .collect()
    }

    fn audit(caller: &Caller, action: AuditAction, record_type: &str, id: RecordId) {
        info!(
            action = action.as_str(),
            subject = caller.subject(),
            record_type = record_type,
            record_id = id.value(),
            "record mutation"
        );
    }
}
