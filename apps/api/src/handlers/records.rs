use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use stockroom_application::{DEFAULT_RECORD_LIST_LIMIT, RecordListQuery};
use stockroom_core::{AppResult, Caller};
use stockroom_domain::{RecordId, RecordStatus};

use crate::dto::{RecordRequest, RecordResponse};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct RecordListParams {
    pub status: Option<String>,
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl RecordListParams {
    fn into_query(self) -> AppResult<RecordListQuery> {
        let status = self
            .status
            .filter(|value| !value.trim().is_empty())
            .map(|value| RecordStatus::from_str(value.as_str()))
            .transpose()?;

        Ok(RecordListQuery {
            status,
            search: self.search,
            limit: self.limit.unwrap_or(DEFAULT_RECORD_LIST_LIMIT),
            offset: self.offset.unwrap_or(0),
        })
    }
}

pub async fn list_records_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(record_type): Path<String>,
    Query(params): Query<RecordListParams>,
) -> ApiResult<Json<Vec<RecordResponse>>> {
    let records = state
        .gateway
        .list(&caller, record_type.as_str(), params.into_query()?)
        .await?
        .into_iter()
        .map(RecordResponse::from)
        .collect();

    Ok(Json(records))
}

pub async fn create_record_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(record_type): Path<String>,
    Json(payload): Json<RecordRequest>,
) -> ApiResult<(StatusCode, Json<RecordResponse>)> {
    let record = state
        .gateway
        .add(&caller, record_type.as_str(), &payload.data)
        .await?;

    Ok((StatusCode::CREATED, Json(RecordResponse::from(record))))
}

pub async fn get_record_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path((record_type, record_id)): Path<(String, i64)>,
) -> ApiResult<Json<RecordResponse>> {
    let record = state
        .gateway
        .get(&caller, record_type.as_str(), RecordId::new(record_id)?)
        .await?;

    Ok(Json(RecordResponse::from(record)))
}

pub async fn update_record_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path((record_type, record_id)): Path<(String, i64)>,
    Json(payload): Json<RecordRequest>,
) -> ApiResult<Json<RecordResponse>> {
    let record = state
        .gateway
        .update(
            &caller,
            record_type.as_str(),
            RecordId::new(record_id)?,
            &payload.data,
        )
        .await?;

    Ok(Json(RecordResponse::from(record)))
}

pub async fn delete_record_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path((record_type, record_id)): Path<(String, i64)>,
) -> ApiResult<StatusCode> {
    state
        .gateway
        .delete(&caller, record_type.as_str(), RecordId::new(record_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
