use axum::Json;
use axum::extract::{Extension, State};
use stockroom_core::Caller;

use crate::dto::RecordTypeResponse;
use crate::state::AppState;

pub async fn list_record_types_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Json<Vec<RecordTypeResponse>> {
    Json(
        state
            .gateway
            .record_types(&caller)
            .into_iter()
            .map(RecordTypeResponse::from)
            .collect(),
    )
}
