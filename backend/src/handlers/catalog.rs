//! Reference data handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::extract::ValidatedQuery;
use crate::models::StatusQuery;
use crate::services::CatalogService;
use crate::AppState;

/// Active clients as `{ identificador, cliente }`
pub async fn list_active_clients(State(state): State<AppState>) -> impl IntoResponse {
    let service = CatalogService::new(state.store.clone());

    match service.active_clients().await {
        Ok(clients) => (StatusCode::OK, Json(clients)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Ingredient categories
pub async fn list_categories(State(state): State<AppState>) -> impl IntoResponse {
    let service = CatalogService::new(state.store.clone());

    match service.categories().await {
        Ok(categories) => (StatusCode::OK, Json(categories)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Suppliers filtered by `estado`
pub async fn list_suppliers(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<StatusQuery>,
) -> impl IntoResponse {
    let service = CatalogService::new(state.store.clone());

    match service.suppliers(query.estado.as_deref()).await {
        Ok(suppliers) => (StatusCode::OK, Json(suppliers)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Active units of measure
pub async fn list_active_units(State(state): State<AppState>) -> impl IntoResponse {
    let service = CatalogService::new(state.store.clone());

    match service.active_units().await {
        Ok(units) => (StatusCode::OK, Json(units)).into_response(),
        Err(e) => e.into_response(),
    }
}
