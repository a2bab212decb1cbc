//! API models for the Plant Scheduling service
//!
//! Re-exports models from the shared crate and adds the response envelopes
//! that only the HTTP layer produces

use serde::{Deserialize, Serialize};

pub use shared::models::*;

/// `{ mensaje }` acknowledgement
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub mensaje: String,
}

impl MessageResponse {
    pub fn new(mensaje: impl Into<String>) -> Self {
        Self {
            mensaje: mensaje.into(),
        }
    }
}

/// Response of `POST /api/Ingredientes/nuevo`
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedIngredientResponse {
    pub mensaje: String,
    pub id: i32,
}

/// Response of `POST /api/ProductosTerminados/registrar`
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisteredProductResponse {
    pub mensaje: String,
    #[serde(rename = "CodigoProducto")]
    pub codigo_producto: String,
}

/// `?estado=` query of the supplier listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusQuery {
    pub estado: Option<String>,
}

/// Response of `GET /health`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub ok: bool,
    pub db_connected: bool,
    pub mode: shared::StoreMode,
    pub version: String,
}
