//! Login handler

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::models::{LoginRequest, UserProfile};
use crate::services::AuthService;
use crate::AppState;

/// Check credentials and return the user's profile
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<Json<UserProfile>> {
    let service = AuthService::new(state.store.clone());
    let profile = service.login(input).await?;
    Ok(Json(profile))
}
