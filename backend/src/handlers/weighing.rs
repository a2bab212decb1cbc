//! Weigh-in handler

use axum::{extract::State, http::StatusCode, Json};

use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::models::{WeighRequest, WeighResponse};
use crate::services::WeighingService;
use crate::AppState;

/// Record a weigh-in from a weighing station
pub async fn record_weigh(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<WeighRequest>,
) -> AppResult<(StatusCode, Json<WeighResponse>)> {
    let service = WeighingService::new(state.store.clone());
    let outcome = service.record(input).await?;
    Ok((StatusCode::CREATED, Json(WeighResponse::from(outcome))))
}
