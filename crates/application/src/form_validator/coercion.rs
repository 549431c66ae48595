use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use serde_json::Value;
use stockroom_domain::{FieldDefinition, FieldKind, FieldValue, RecordId, RecordStatus};

use super::{INVALID_CHOICE_REASON, REQUIRED_REASON};

const LOCAL_DATETIME_FORMATS: &[&str] =
    &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Coerces one raw value according to its field definition.
pub(super) fn coerce_value(
    field: &FieldDefinition,
    raw: Option<&Value>,
) -> Result<FieldValue, String> {
    let Some(raw) = raw.filter(|value| !is_blank(value)) else {
        if field.is_required() {
            return Err(REQUIRED_REASON.to_owned());
        }
        return Ok(FieldValue::Null);
    };

    match field.kind() {
        FieldKind::Text | FieldKind::LongText => raw
            .as_str()
            .map(|text| FieldValue::Text(text.trim().to_owned()))
            .ok_or_else(|| "enter a text value".to_owned()),
        FieldKind::Integer => parse_integer(raw)
            .map(FieldValue::Integer)
            .ok_or_else(|| "enter a whole number".to_owned()),
        FieldKind::DateTime => raw
            .as_str()
            .and_then(parse_datetime)
            .map(|value| {
                let value = value.trunc_subsecs(6);
                FieldValue::Text(value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            })
            .ok_or_else(|| "enter a valid date/time".to_owned()),
        FieldKind::Enum { choices } => {
            let choice = match raw {
                Value::String(text) => text.trim().to_owned(),
                Value::Number(number) => number.to_string(),
                _ => return Err("enter a text value".to_owned()),
            };

            if choices.iter().any(|allowed| allowed == &choice) {
                Ok(FieldValue::Text(choice))
            } else {
                Err(format!(
                    "select a valid choice; '{choice}' is not one of the available choices"
                ))
            }
        }
        FieldKind::ForeignKey { .. } => parse_integer(raw)
            .and_then(|value| RecordId::new(value).ok())
            .map(|id| FieldValue::Integer(id.value()))
            .ok_or_else(|| INVALID_CHOICE_REASON.to_owned()),
    }
}

/// Resolves the reserved `status` input, falling back to the default when absent.
pub(super) fn coerce_status(
    raw: Option<&Value>,
    default_status: RecordStatus,
) -> Result<RecordStatus, String> {
    let Some(raw) = raw.filter(|value| !is_blank(value)) else {
        return Ok(default_status);
    };

    let parsed = match raw {
        Value::String(text) => RecordStatus::from_str(text).ok(),
        Value::Number(number) => number
            .as_i64()
            .and_then(|code| RecordStatus::from_code(code).ok()),
        _ => None,
    };

    parsed.ok_or_else(|| {
        let shown = match raw {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        format!("select a valid choice; '{shown}' is not one of the available choices")
    })
}

/// Returns the referenced identity of a coerced foreign-key value.
pub(super) fn record_reference(value: &FieldValue) -> Option<RecordId> {
    value
        .as_integer()
        .and_then(|value| RecordId::new(value).ok())
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

fn parse_integer(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(value) = DateTime::parse_from_rfc3339(text) {
        return Some(value.with_timezone(&Utc));
    }

    LOCAL_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|value| value.and_utc())
}
