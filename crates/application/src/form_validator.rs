use std::sync::Arc;

use serde_json::{Map, Value};
use stockroom_core::{AppResult, FieldErrors};
use stockroom_domain::{
    FieldDefinition, FieldKind, FieldValue, RESERVED_FIELD_NAMES, Record, RecordFields,
    RecordStatus, RecordType,
};

use crate::RecordStore;

mod coercion;


use coercion::{coerce_status, coerce_value, record_reference};

/// Raw form submission keyed by field name.
pub type FormInput = Map<String, Value>;

/// Reason attached to a missing required field.
pub const REQUIRED_REASON: &str = "this field is required";
/// Reason attached to a foreign key whose target is absent or unusable.
pub const INVALID_CHOICE_REASON: &str =
    "select a valid choice; that choice is not one of the available choices";

/// Values accepted by the validator, ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFields {
    /// Coerced values for every declared field.
    pub fields: RecordFields,
    /// Resolved record status.
    pub status: RecordStatus,
}

/// Outcome of validating one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Every field passed.
    Valid(ValidatedFields),
    /// One or more fields failed; all reasons are collected.
    Invalid(FieldErrors),
}

impl ValidationResult {
    /// Returns whether validation passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Checks submissions against a record type schema.
///
/// Holds the record store so foreign keys can be checked against their target type.
#[derive(Clone)]
pub struct FormValidator {
    store: Arc<dyn RecordStore>,
}

impl FormValidator {
    /// Creates a validator that resolves foreign keys through the given store.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Validates a create submission. A missing status defaults to `Active`.
    pub async fn validate(
        &self,
        record_type: &RecordType,
        input: &FormInput,
    ) -> AppResult<ValidationResult> {
        self.validate_with_default_status(record_type, input, RecordStatus::Active)
            .await
    }

    /// Validates an update submission merged over the existing record.
    ///
    /// Fields absent from the submission keep their stored values and are
    /// validated again together with the supplied ones.
    pub async fn validate_update(
        &self,
        record_type: &RecordType,
        existing: &Record,
        input: &FormInput,
    ) -> AppResult<ValidationResult> {
        let mut merged = FormInput::new();
        for (name, value) in existing.fields() {
            merged.insert(name.clone(), field_value_to_json(value));
        }
        for (name, value) in input {
            merged.insert(name.clone(), value.clone());
        }

        self.validate_with_default_status(record_type, &merged, existing.status())
            .await
    }

    async fn validate_with_default_status(
        &self,
        record_type: &RecordType,
        input: &FormInput,
        default_status: RecordStatus,
    ) -> AppResult<ValidationResult> {
        let mut errors = FieldErrors::new();

        for key in input.keys() {
            if key == "status" || record_type.field(key).is_some() {
                continue;
            }

            if RESERVED_FIELD_NAMES.contains(&key.as_str()) {
                errors.insert(key.clone(), "this field is managed by the store");
            } else {
                errors.insert(key.clone(), "unknown field");
            }
        }

        let status = match coerce_status(input.get("status"), default_status) {
            Ok(status) => status,
            Err(reason) => {
                errors.insert("status", reason);
                default_status
            }
        };

        let mut fields = RecordFields::new();
        for field in record_type.fields() {
            match self.validate_field(field, input.get(field.name())).await? {
                Ok(value) => {
                    fields.insert(field.name().to_owned(), value);
                }
                Err(reason) => errors.insert(field.name(), reason),
            }
        }

        if !errors.is_empty() {
            return Ok(ValidationResult::Invalid(errors));
        }

        Ok(ValidationResult::Valid(ValidatedFields { fields, status }))
    }

    async fn validate_field(
        &self,
        field: &FieldDefinition,
        raw: Option<&Value>,
    ) -> AppResult<Result<FieldValue, String>> {
        let value = match coerce_value(field, raw) {
            Ok(value) => value,
            Err(reason) => return Ok(Err(reason)),
        };

        let FieldKind::ForeignKey {
            target,
            active_only,
        } = field.kind()
        else {
            return Ok(Ok(value));
        };

        let Some(id) = record_reference(&value) else {
            return Ok(Ok(value));
        };

        let usable = match self.store.find_status(target, id).await? {
            None => false,
            Some(RecordStatus::Inactive) => !active_only,
            Some(RecordStatus::Active) => true,
        };

        if !usable {
            return Ok(Err(INVALID_CHOICE_REASON.to_owned()));
        }

        Ok(Ok(value))
    }
}

fn field_value_to_json(value: &FieldValue) -> Value {
    match value {
        FieldValue::Text(text) => Value::String(text.clone()),
        FieldValue::Integer(number) => Value::from(*number),
        FieldValue::Null => Value::Null,
    }
}
