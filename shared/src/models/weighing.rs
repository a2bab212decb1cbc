//! Weigh-in models for `POST /peso`

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::IngredientRef;

/// Body sent by a weighing station
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct WeighRequest {
    #[validate(required)]
    pub consecutivo: Option<i32>,

    #[validate(required, length(min = 1, max = 50))]
    pub producto_terminado: Option<String>,

    #[validate(required, range(min = 1))]
    pub secuencia: Option<i32>,

    #[validate(required)]
    pub ingrediente: Option<IngredientRef>,

    #[validate(required)]
    pub tara: Option<Decimal>,

    #[validate(required)]
    pub peso: Option<Decimal>,

    #[validate(length(max = 100))]
    pub etiqueta: Option<String>,

    /// Photo of the scale display, base64 (optionally as a data URL)
    pub foto_base64: Option<String>,
}

/// Validated weigh-in
#[derive(Debug, Clone, PartialEq)]
pub struct WeighIn {
    pub consecutivo: i32,
    pub producto_terminado: String,
    pub secuencia: i32,
    pub ingrediente_id: i32,
    pub tara: Decimal,
    pub peso: Decimal,
    pub etiqueta: Option<String>,
    pub foto: Option<Vec<u8>>,
}

/// Next line to weigh, handed back after a weigh-in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct PendingLine {
    pub secuencia: i32,
    pub ingrediente_id: i32,
    /// Ingredient name
    pub ingrediente: Option<String>,
    pub peso_objetivo: Decimal,
    pub porcentaje: Decimal,
}

/// Result of the weighing workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WeighOutcome {
    /// Lines of the batch still pending after this weigh-in
    pub remaining: i32,
    pub completed: bool,
    /// Only present while the batch is not completed
    pub next: Option<PendingLine>,
}

/// Response of `POST /peso`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeighResponse {
    pub ok: bool,
    pub mensaje: String,
    pub remaining: i32,
    pub completed: bool,
    pub next: Option<PendingLine>,
}

impl From<WeighOutcome> for WeighResponse {
    fn from(outcome: WeighOutcome) -> Self {
        let mensaje = if outcome.completed {
            "Peso registrado, lote completado".to_string()
        } else {
            "Peso registrado".to_string()
        };

        Self {
            ok: true,
            mensaje,
            remaining: outcome.remaining,
            completed: outcome.completed,
            next: outcome.next,
        }
    }
}
