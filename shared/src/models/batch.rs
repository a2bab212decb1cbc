//! Scheduled production batches, their control row and detail lines

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /lotesprogramados/programar`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleRequest {
    #[validate(required, length(min = 1, max = 50))]
    pub codigo_producto: Option<String>,

    /// `YYYY-MM-DD`
    #[validate(required)]
    pub fecha_programada: Option<String>,

    #[validate(required, length(min = 1, max = 100))]
    pub usuario_programo: Option<String>,

    #[validate(required, range(min = 1, max = 500))]
    pub cantidad_lotes: Option<i32>,

    #[validate(required)]
    pub peso_por_lote: Option<Decimal>,

    pub unidad_medida_id: Option<i32>,
}

/// Validated scheduling command handed to the store
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleCommand {
    pub codigo_producto: String,
    pub fecha_programada: NaiveDate,
    pub usuario_programo: String,
    pub cantidad_lotes: i32,
    pub peso_por_lote: Decimal,
    pub unidad_medida_id: Option<i32>,
}

/// One ingredient line of a scheduled batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct BatchDetailLine {
    pub consecutivo: i32,
    pub producto_terminado: String,
    pub secuencia: i32,
    pub ingrediente_id: i32,
    /// Ingredient name
    pub ingrediente: Option<String>,
    pub peso_objetivo: Decimal,
    pub porcentaje: Decimal,
    pub tara: Option<Decimal>,
    pub peso: Option<Decimal>,
    /// `None` while the line is pending
    pub tiempo_de_pesado: Option<NaiveDateTime>,
    pub etiqueta: Option<String>,
    pub tiene_foto: bool,
}

impl BatchDetailLine {
    pub fn is_weighed(&self) -> bool {
        self.tiempo_de_pesado.is_some()
    }
}

/// Response of `GET /lotesprogramados/detallelote`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchDetailResponse {
    pub detalle: Vec<BatchDetailLine>,
    #[serde(rename = "maxSecuencia")]
    pub max_secuencia: i32,
}

/// Control state of a batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct BatchStatus {
    pub consecutivo: i32,
    pub producto_terminado: String,
    pub lote: String,
    pub cancelado: bool,
    pub fecha_programada: Option<NaiveDate>,
    pub linea_mezclado: Option<String>,
    pub produccion_inicio: Option<NaiveDateTime>,
    pub produccion_final: Option<NaiveDateTime>,
    pub lote_completado: bool,
    pub lineas_pendientes: i32,
}

/// Batch still waiting to be weighed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct PendingBatch {
    pub consecutivo: i32,
    pub producto_terminado: String,
    /// Finished product name
    pub producto: Option<String>,
    pub lote: String,
    pub fecha_programada: Option<NaiveDate>,
    pub linea_mezclado: Option<String>,
    pub lineas_pendientes: i32,
    pub total_lineas: i32,
}

/// `?consecutivo=` query of the batch lookups
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchQuery {
    pub consecutivo: Option<String>,
}

/// `?fecha=` query of the pending-batch listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PendingQuery {
    pub fecha: Option<String>,
}

/// Body of `POST /lotesprogramados/cancelar`: a single id or an inclusive range.
/// Which combination is valid is decided by [`CancelRequest::target`].
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct CancelRequest {
    pub consecutivo: Option<i32>,
    pub desde: Option<i32>,
    pub hasta: Option<i32>,
}

/// Which batches to cancel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelTarget {
    Single(i32),
    Range { from: i32, to: i32 },
}

impl CancelTarget {
    pub fn contains(&self, consecutivo: i32) -> bool {
        match *self {
            CancelTarget::Single(id) => id == consecutivo,
            CancelTarget::Range { from, to } => (from..=to).contains(&consecutivo),
        }
    }

    /// Inclusive bounds, for the SQL `BETWEEN`
    pub fn bounds(&self) -> (i32, i32) {
        match *self {
            CancelTarget::Single(id) => (id, id),
            CancelTarget::Range { from, to } => (from, to),
        }
    }
}

impl CancelRequest {
    pub fn target(&self) -> Result<CancelTarget, &'static str> {
        match (self.consecutivo, self.desde, self.hasta) {
            (Some(id), None, None) if id > 0 => Ok(CancelTarget::Single(id)),
            (Some(_), None, None) => Err("Consecutivo must be positive"),
            (None, Some(from), Some(to)) if from > 0 && from <= to => {
                Ok(CancelTarget::Range { from, to })
            }
            (None, Some(_), Some(_)) => Err("Desde must be positive and not greater than Hasta"),
            _ => Err("Send either Consecutivo or both Desde and Hasta"),
        }
    }
}

/// Response of `POST /lotesprogramados/cancelar`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResponse {
    pub mensaje: String,
    pub cancelados: u64,
}
