//! Route definitions for the Plant Scheduling service

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::require_api_key, AppState};

/// All routes. Everything except `/health` sits behind the API key check.
pub fn app_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/login", post(handlers::login))
        .route("/peso", post(handlers::record_weigh))
        .nest("/lotesprogramados", batch_routes())
        .nest("/api", api_routes())
        .route_layer(middleware::from_fn_with_state(state, require_api_key));

    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        .merge(protected)
}

/// Master data and reference listings
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/Clientes/activos", get(handlers::list_active_clients))
        .route("/Categorias/listado", get(handlers::list_categories))
        .route("/Proveedores/listado", get(handlers::list_suppliers))
        .route("/UnidadesMedida/activas", get(handlers::list_active_units))
        .nest("/Ingredientes", ingredient_routes())
        .nest("/ProductosTerminados", product_routes())
}

/// Ingredient routes
fn ingredient_routes() -> Router<AppState> {
    Router::new()
        .route("/listado", get(handlers::list_ingredients))
        .route("/nuevo", post(handlers::create_ingredient))
        .route("/actualizar/:id", put(handlers::update_ingredient))
}

/// Finished product routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/listado", get(handlers::list_finished_products))
        .route("/registrar", post(handlers::register_finished_product))
        .route("/editar/:codigo", put(handlers::edit_finished_product))
        .route("/:codigo", get(handlers::get_finished_product))
}

/// Scheduled batch routes
fn batch_routes() -> Router<AppState> {
    Router::new()
        .route("/programar", post(handlers::schedule_batches))
        .route("/detallelote", get(handlers::batch_detail))
        .route("/pendientes", get(handlers::pending_batches))
        .route("/estado", get(handlers::batch_status))
        .route("/cancelar", post(handlers::cancel_batches))
}
