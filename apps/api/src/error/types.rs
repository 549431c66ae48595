use serde::Serialize;
use stockroom_core::FieldErrors;

/// API error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field_errors: Option<FieldErrors>,
}

impl ErrorResponse {
    pub(super) fn new(message: String) -> Self {
        Self {
            message,
            field_errors: None,
        }
    }

    pub(super) fn with_field_errors(message: String, field_errors: FieldErrors) -> Self {
        Self {
            message,
            field_errors: Some(field_errors),
        }
    }
}
