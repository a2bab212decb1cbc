//! Health check handler

use axum::{extract::State, Json};

use crate::models::HealthResponse;
use crate::AppState;

/// Liveness plus store connectivity. Never fails, so monitors can tell a
/// running process in mock mode from a dead one.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_connected = state.store.is_connected().await;

    Json(HealthResponse {
        ok: true,
        db_connected,
        mode: state.store.mode(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
