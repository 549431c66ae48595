use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use stockroom_core::{AppError, AppResult, NonEmptyString};

/// Field names owned by the store and never declared on a record type.
pub const RESERVED_FIELD_NAMES: &[&str] = &["id", "status", "created_at", "updated_at"];

/// Supported field kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FieldKind {
    /// Single-line text.
    Text,
    /// Multi-line text.
    LongText,
    /// Whole number.
    Integer,
    /// Timestamp, stored normalized as RFC 3339.
    DateTime,
    /// One of a fixed set of choice keys.
    Enum {
        /// Allowed choice keys.
        choices: Vec<String>,
    },
    /// Identity of a record in another record type.
    ForeignKey {
        /// Target record type logical name.
        target: String,
        /// Only `Active` target records are accepted.
        active_only: bool,
    },
}

impl FieldKind {
    /// Returns a stable storage value for the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::LongText => "longtext",
            Self::Integer => "integer",
            Self::DateTime => "datetime",
            Self::Enum { .. } => "enum",
            Self::ForeignKey { .. } => "foreign_key",
        }
    }

    /// Returns the foreign-key target, when this is a foreign key.
    #[must_use]
    pub fn foreign_key_target(&self) -> Option<&str> {
        match self {
            Self::ForeignKey { target, .. } => Some(target.as_str()),
            _ => None,
        }
    }
}

/// One field of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDefinition {
    name: NonEmptyString,
    display_name: NonEmptyString,
    kind: FieldKind,
    required: bool,
}

impl FieldDefinition {
    /// Creates a validated field definition.
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        kind: FieldKind,
        required: bool,
    ) -> AppResult<Self> {
        let name = NonEmptyString::new(name)?;
        if RESERVED_FIELD_NAMES.contains(&name.as_str()) {
            return Err(AppError::Validation(format!(
                "field name '{}' is reserved",
                name.as_str()
            )));
        }

        match &kind {
            FieldKind::Enum { choices } if choices.is_empty() => {
                return Err(AppError::Validation(format!(
                    "enum field '{}' requires at least one choice",
                    name.as_str()
                )));
            }
            FieldKind::ForeignKey { target, .. } if target.trim().is_empty() => {
                return Err(AppError::Validation(format!(
                    "foreign key field '{}' requires a target record type",
                    name.as_str()
                )));
            }
            _ => {}
        }

        Ok(Self {
            name,
            display_name: NonEmptyString::new(display_name)?,
            kind,
            required,
        })
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the display label.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the field kind.
    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Returns whether a value must be supplied.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// Default list order of a record type, by identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListOrdering {
    /// Oldest first.
    #[default]
    Ascending,
    /// Newest first.
    Descending,
}

/// Named schema a record belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordType {
    logical_name: NonEmptyString,
    display_name: NonEmptyString,
    table_name: NonEmptyString,
    fields: Vec<FieldDefinition>,
    ordering: ListOrdering,
    search_fields: Vec<String>,
}

impl RecordType {
    /// Creates a record type with invariant checks.
    pub fn new(
        logical_name: impl Into<String>,
        display_name: impl Into<String>,
        table_name: impl Into<String>,
        fields: Vec<FieldDefinition>,
        ordering: ListOrdering,
    ) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name()) {
                return Err(AppError::Validation(format!(
                    "duplicate field name '{}' in record type",
                    field.name()
                )));
            }
        }

        Ok(Self {
            logical_name: NonEmptyString::new(logical_name)?,
            display_name: NonEmptyString::new(display_name)?,
            table_name: NonEmptyString::new(table_name)?,
            fields,
            ordering,
            search_fields: Vec::new(),
        })
    }

    /// Declares the fields matched by a list search.
    ///
    /// Only text, long text and integer fields can be searched.
    pub fn with_search_fields(mut self, names: &[&str]) -> AppResult<Self> {
        for name in names {
            let field = self.field(name).ok_or_else(|| {
                AppError::Validation(format!(
                    "search field '{name}' is not declared on record type '{}'",
                    self.logical_name()
                ))
            })?;

            if !matches!(
                field.kind(),
                FieldKind::Text | FieldKind::LongText | FieldKind::Integer
            ) {
                return Err(AppError::Validation(format!(
                    "field '{}.{name}' of kind '{}' cannot be searched",
                    self.logical_name(),
                    field.kind().as_str()
                )));
            }
        }

        self.search_fields = names.iter().map(|name| (*name).to_owned()).collect();
        Ok(self)
    }

    /// Returns the stable logical name.
    #[must_use]
    pub fn logical_name(&self) -> &str {
        self.logical_name.as_str()
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the legacy table this type mirrors.
    ///
    /// Stores key rows by logical name; the table name is reported to
    /// clients describing the catalog.
    #[must_use]
    pub fn table_name(&self) -> &str {
        self.table_name.as_str()
    }

    /// Returns fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Looks up one field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Returns the default list order.
    #[must_use]
    pub fn ordering(&self) -> ListOrdering {
        self.ordering
    }

    /// Returns the fields matched by a list search.
    #[must_use]
    pub fn search_fields(&self) -> &[String] {
        &self.search_fields
    }
}

/// Closed set of record types known to a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordTypeCatalog {
    record_types: Vec<RecordType>,
}

impl RecordTypeCatalog {
    /// Creates a catalog; names must be unique and foreign keys must resolve inside it.
    pub fn new(record_types: Vec<RecordType>) -> AppResult<Self> {
        let mut names = HashSet::new();
        for record_type in &record_types {
            if !names.insert(record_type.logical_name()) {
                return Err(AppError::Validation(format!(
                    "duplicate record type '{}'",
                    record_type.logical_name()
                )));
            }
        }

        for record_type in &record_types {
            for field in record_type.fields() {
                let Some(target) = field.kind().foreign_key_target() else {
                    continue;
                };

                if !names.contains(target) {
                    return Err(AppError::Validation(format!(
                        "field '{}.{}' references unknown record type '{}'",
                        record_type.logical_name(),
                        field.name(),
                        target
                    )));
                }
            }
        }

        Ok(Self { record_types })
    }

    /// Looks up a record type by logical name.
    #[must_use]
    pub fn get(&self, logical_name: &str) -> Option<&RecordType> {
        self.record_types
            .iter()
            .find(|record_type| record_type.logical_name() == logical_name)
    }

    /// Looks up a record type or fails with `NotFound`.
    pub fn require(&self, logical_name: &str) -> AppResult<&RecordType> {
        self.get(logical_name).ok_or_else(|| {
            AppError::NotFound(format!("record type '{logical_name}' does not exist"))
        })
    }

    /// Returns all record types in declaration order.
    #[must_use]
    pub fn record_types(&self) -> &[RecordType] {
        &self.record_types
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldDefinition, FieldKind, ListOrdering, RecordType, RecordTypeCatalog};

    fn name_field() -> FieldDefinition {
        FieldDefinition::new("name", "Name", FieldKind::Text, true)
            .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn reserved_field_names_are_rejected() {
        let result = FieldDefinition::new("status", "Status", FieldKind::Text, false);
        assert!(result.is_err());
    }

    #[test]
    fn enum_fields_require_choices() {
        let result = FieldDefinition::new(
            "size",
            "Size",
            FieldKind::Enum {
                choices: Vec::new(),
            },
            true,
        );
        assert!(result.is_err());
    }

    #[test]
    fn record_type_rejects_duplicate_fields() {
        let result = RecordType::new(
            "uom",
            "Unit of measure",
            "stock_items_uom",
            vec![name_field(), name_field()],
            ListOrdering::Ascending,
        );
        assert!(result.is_err());
    }

    #[test]
    fn search_fields_must_be_declared_and_textual() {
        let uom = || {
            RecordType::new(
                "uom",
                "Unit of measure",
                "stock_items_uom",
                vec![
                    name_field(),
                    FieldDefinition::new("opened", "Opened", FieldKind::DateTime, false)
                        .unwrap_or_else(|_| unreachable!()),
                ],
                ListOrdering::Ascending,
            )
            .unwrap_or_else(|_| unreachable!())
        };

        let searchable = uom().with_search_fields(&["name"]);
        assert_eq!(
            searchable.map(|value| value.search_fields().to_vec()).unwrap_or_default(),
            vec!["name".to_owned()]
        );
        assert!(uom().with_search_fields(&["code"]).is_err());
        assert!(uom().with_search_fields(&["opened"]).is_err());
    }

    #[test]
    fn catalog_rejects_dangling_foreign_keys() {
        let item = RecordType::new(
            "item",
            "Item",
            "stock_items",
            vec![
                FieldDefinition::new(
                    "uom",
                    "UOM",
                    FieldKind::ForeignKey {
                        target: "uom".to_owned(),
                        active_only: false,
                    },
                    true,
                )
                .unwrap_or_else(|_| unreachable!()),
            ],
            ListOrdering::Ascending,
        )
        .unwrap_or_else(|_| unreachable!());

        let result = RecordTypeCatalog::new(vec![item]);
        assert!(result.is_err());
    }

    #[test]
    fn catalog_require_reports_not_found() {
        let catalog = RecordTypeCatalog::new(Vec::new()).unwrap_or_else(|_| unreachable!());
        assert!(matches!(
            catalog.require("uom"),
            Err(stockroom_core::AppError::NotFound(_))
        ));
    }
}
