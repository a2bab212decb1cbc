//! Ingredient handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::extract::{ValidatedJson, ValidatedQuery};
use crate::models::{CreatedIngredientResponse, IngredientQuery, IngredientRequest, MessageResponse};
use crate::services::IngredientService;
use crate::AppState;

/// List ingredients filtered by name, category and `estado`
pub async fn list_ingredients(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<IngredientQuery>,
) -> impl IntoResponse {
    let service = IngredientService::new(state.store.clone());

    match service.list(query).await {
        Ok(ingredients) => (StatusCode::OK, Json(ingredients)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create an ingredient
pub async fn create_ingredient(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<IngredientRequest>,
) -> impl IntoResponse {
    let service = IngredientService::new(state.store.clone());

    match service.create(input).await {
        Ok(id) => (
            StatusCode::CREATED,
            Json(CreatedIngredientResponse {
                mensaje: "Ingrediente creado".to_string(),
                id,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update an ingredient
pub async fn update_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<IngredientRequest>,
) -> impl IntoResponse {
    let service = IngredientService::new(state.store.clone());

    match service.update(id, input).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse::new("Ingrediente actualizado")),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
