use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use stockroom_core::{AppError, AppResult, NonEmptyString};

/// Store-assigned record identity. Identities start at 1 per record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Creates a validated record identifier.
    pub fn new(value: i64) -> AppResult<Self> {
        if value <= 0 {
            return Err(AppError::Validation(format!(
                "record id must be positive, got {value}"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the underlying integer.
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parsed = value
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::Validation(format!("invalid record id '{value}'")))?;
        Self::new(parsed)
    }
}

/// Caller-controlled record status. `Inactive` never means deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordStatus {
    /// Record is in use.
    #[default]
    Active,
    /// Record is retired but still stored.
    Inactive,
}

impl RecordStatus {
    /// Returns a stable storage value for the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    /// Parses the legacy integer encodings (`1` active, `0` or `2` inactive).
    pub fn from_code(code: i64) -> AppResult<Self> {
        match code {
            1 => Ok(Self::Active),
            0 | 2 => Ok(Self::Inactive),
            _ => Err(AppError::Validation(format!("unknown status code {code}"))),
        }
    }
}

impl FromStr for RecordStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("active") {
            return Ok(Self::Active);
        }
        if trimmed.eq_ignore_ascii_case("inactive") {
            return Ok(Self::Inactive);
        }
        if let Ok(code) = trimmed.parse::<i64>() {
            return Self::from_code(code);
        }

        Err(AppError::Validation(format!("unknown status '{value}'")))
    }
}

/// A single coerced field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text, long text, enum choice keys and normalized timestamps.
    Text(String),
    /// Integers and foreign-key ids.
    Integer(i64),
    /// Absent optional value.
    Null,
}

impl FieldValue {
    /// Returns the text payload, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns the integer payload, if any.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns whether the value is `Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Ordered field name to value mapping.
pub type RecordFields = BTreeMap<String, FieldValue>;

/// One stored row of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    id: RecordId,
    record_type: NonEmptyString,
    fields: RecordFields,
    status: RecordStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Record {
    /// Creates a freshly inserted record; both timestamps are `now`.
    pub fn created(
        id: RecordId,
        record_type: impl Into<String>,
        fields: RecordFields,
        status: RecordStatus,
        now: DateTime<Utc>,
    ) -> AppResult<Self> {
        Self::restore(id, record_type, fields, status, now, now)
    }

    /// Rebuilds a stored record and checks its timestamp invariant.
    pub fn restore(
        id: RecordId,
        record_type: impl Into<String>,
        fields: RecordFields,
        status: RecordStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        if updated_at < created_at {
            return Err(AppError::Internal(format!(
                "record {id} has updated_at before created_at"
            )));
        }

        Ok(Self {
            id,
            record_type: NonEmptyString::new(record_type)?,
            fields,
            status,
            created_at,
            updated_at,
        })
    }

    /// Returns a copy with replaced values and an `updated_at` strictly after the current one.
    #[must_use]
    pub fn updated(&self, fields: RecordFields, status: RecordStatus, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            record_type: self.record_type.clone(),
            fields,
            status,
            created_at: self.created_at,
            updated_at: next_updated_at(self.updated_at, now),
        }
    }

    /// Returns the store-assigned identity.
    #[must_use]
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Returns the owning record type logical name.
    #[must_use]
    pub fn record_type(&self) -> &str {
        self.record_type.as_str()
    }

    /// Returns all field values.
    #[must_use]
    pub fn fields(&self) -> &RecordFields {
        &self.fields
    }

    /// Returns one field value.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns the record status.
    #[must_use]
    pub fn status(&self) -> RecordStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last mutation timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Returns `now`, or one microsecond past `previous` when the clock has not moved.
#[must_use]
pub fn next_updated_at(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    let floor = previous + Duration::microseconds(1);
    if now < floor { floor } else { now }
}
