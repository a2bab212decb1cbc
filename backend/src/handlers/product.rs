//! Finished product handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::extract::{ValidatedJson, ValidatedQuery};
use crate::models::{
    FinishedProduct, FinishedProductDetail, FinishedProductRequest, MessageResponse,
    ProductQuery, RegisteredProductResponse,
};
use crate::services::ProductService;
use crate::AppState;

/// List finished products filtered by name, client and `estado`
pub async fn list_finished_products(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ProductQuery>,
) -> AppResult<Json<Vec<FinishedProduct>>> {
    let service = ProductService::new(state.store.clone());
    let products = service.list(query).await?;
    Ok(Json(products))
}

/// Finished product with its recipe
pub async fn get_finished_product(
    State(state): State<AppState>,
    Path(codigo): Path<String>,
) -> AppResult<Json<FinishedProductDetail>> {
    let service = ProductService::new(state.store.clone());
    let product = service.get(&codigo).await?;
    Ok(Json(product))
}

/// Register a finished product with its recipe
pub async fn register_finished_product(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<FinishedProductRequest>,
) -> AppResult<(StatusCode, Json<RegisteredProductResponse>)> {
    let service = ProductService::new(state.store.clone());
    let codigo_producto = service.register(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisteredProductResponse {
            mensaje: "Producto terminado registrado".to_string(),
            codigo_producto,
        }),
    ))
}

/// Update a finished product and replace its recipe
pub async fn edit_finished_product(
    State(state): State<AppState>,
    Path(codigo): Path<String>,
    ValidatedJson(input): ValidatedJson<FinishedProductRequest>,
) -> AppResult<Json<MessageResponse>> {
    let service = ProductService::new(state.store.clone());
    service.edit(&codigo, input).await?;
    Ok(Json(MessageResponse::new("Producto terminado actualizado")))
}
