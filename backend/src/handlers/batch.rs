//! Scheduled batch handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::extract::{ValidatedJson, ValidatedQuery};
use crate::models::{
    BatchDetailResponse, BatchQuery, BatchStatus, CancelRequest, CancelResponse,
    MessageResponse, PendingBatch, PendingQuery, ScheduleRequest,
};
use crate::services::SchedulingService;
use crate::AppState;

/// Schedule batches of a finished product
pub async fn schedule_batches(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ScheduleRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let service = SchedulingService::new(state.store.clone());
    let lotes = service.schedule(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(format!("{} lote(s) programado(s)", lotes))),
    ))
}

/// Detail lines of one batch
pub async fn batch_detail(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<BatchQuery>,
) -> AppResult<Json<BatchDetailResponse>> {
    let service = SchedulingService::new(state.store.clone());
    Ok(Json(service.detail(query).await?))
}

/// Batches still waiting to be weighed
pub async fn pending_batches(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<PendingQuery>,
) -> AppResult<Json<Vec<PendingBatch>>> {
    let service = SchedulingService::new(state.store.clone());
    Ok(Json(service.pending(query).await?))
}

/// Control state of one batch
pub async fn batch_status(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<BatchQuery>,
) -> AppResult<Json<BatchStatus>> {
    let service = SchedulingService::new(state.store.clone());
    Ok(Json(service.status(query).await?))
}

/// Soft-cancel one batch or a range
pub async fn cancel_batches(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CancelRequest>,
) -> AppResult<Json<CancelResponse>> {
    let service = SchedulingService::new(state.store.clone());
    Ok(Json(service.cancel(input).await?))
}
