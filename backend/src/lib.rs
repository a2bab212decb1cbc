//! Plant Scheduling service
//!
//! HTTP backend for a food-production plant: finished-product recipes,
//! batch scheduling and the weighing stations that record each ingredient
//! of a scheduled batch.

use axum::Router;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use config::Config;
use store::DataStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DataStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn DataStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::app_routes(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
