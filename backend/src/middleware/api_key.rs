//! Shared-secret API key check
//!
//! When an API key is configured every request must carry it in the
//! `x-api-key` header. Routes mounted outside this layer (the health check)
//! stay public.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::AppState;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Whether the presented key grants access
fn key_matches(expected: &str, provided: Option<&str>) -> bool {
    matches!(provided.map(str::trim), Some(key) if key == expected)
}

/// Reject requests without the configured API key
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.config.api_key() else {
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok());

    if !key_matches(expected, provided) {
        tracing::debug!(
            "Rejected {} {}: missing or wrong API key",
            request.method(),
            request.uri().path()
        );
        return unauthorized_response(provided.is_some());
    }

    next.run(request).await
}

fn unauthorized_response(key_sent: bool) -> Response {
    let (message, message_es) = if key_sent {
        ("Invalid API key", "Clave de API inválida")
    } else {
        ("Missing x-api-key header", "Falta el encabezado x-api-key")
    };

    AppError::Unauthorized {
        message: message.to_string(),
        message_es: message_es.to_string(),
    }
    .into_response()
}
