//! Weigh-ins sent by the weighing stations

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::sync::Arc;

use shared::{non_blank, validate_reading, WeighIn, WeighOutcome, WeighRequest};

use crate::error::{AppError, AppResult};
use crate::store::DataStore;

/// Weighing service
#[derive(Clone)]
pub struct WeighingService {
    store: Arc<dyn DataStore>,
}

/// Decode a base64 photo, accepting an optional `data:<mime>;base64,` prefix
pub fn decode_photo(raw: &str) -> Result<Vec<u8>, &'static str> {
    let raw = raw.trim();
    let payload = match raw.strip_prefix("data:") {
        Some(rest) => match rest.split_once(',') {
            Some((_, data)) => data,
            None => return Err("FotoBase64 data URL has no payload"),
        },
        None => raw,
    };

    BASE64
        .decode(payload.trim())
        .map_err(|_| "FotoBase64 is not valid base64")
}

impl WeighingService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Record one weigh-in and advance the batch
    pub async fn record(&self, input: WeighRequest) -> AppResult<WeighOutcome> {
        let weigh = Self::weigh_in(input)?;

        let outcome = self.store.record_weigh(&weigh).await?;
        if outcome.completed {
            tracing::info!(
                "Batch {} completed with sequence {}",
                weigh.consecutivo,
                weigh.secuencia
            );
        } else {
            tracing::info!(
                "Weighed batch {} sequence {}, {} lines pending",
                weigh.consecutivo,
                weigh.secuencia,
                outcome.remaining
            );
        }
        Ok(outcome)
    }

    fn weigh_in(input: WeighRequest) -> AppResult<WeighIn> {
        let consecutivo = input
            .consecutivo
            .ok_or_else(|| AppError::missing_field("Consecutivo"))?;
        let producto_terminado = non_blank(input.producto_terminado.as_deref())
            .ok_or_else(|| AppError::missing_field("ProductoTerminado"))?;
        let secuencia = input
            .secuencia
            .ok_or_else(|| AppError::missing_field("Secuencia"))?;
        let ingrediente_id = input
            .ingrediente
            .as_ref()
            .ok_or_else(|| AppError::missing_field("Ingrediente"))?
            .id()
            .map_err(|msg| AppError::invalid_field("Ingrediente", msg))?;
        let tara = input.tara.ok_or_else(|| AppError::missing_field("Tara"))?;
        let peso = input.peso.ok_or_else(|| AppError::missing_field("Peso"))?;

        validate_reading(tara).map_err(|msg| AppError::invalid_field("Tara", msg))?;
        validate_reading(peso).map_err(|msg| AppError::invalid_field("Peso", msg))?;

        let foto = match non_blank(input.foto_base64.as_deref()) {
            Some(raw) => {
                Some(decode_photo(&raw).map_err(|msg| AppError::invalid_field("FotoBase64", msg))?)
            }
            None => None,
        };

        Ok(WeighIn {
            consecutivo,
            producto_terminado,
            secuencia,
            ingrediente_id,
            tara,
            peso,
            etiqueta: non_blank(input.etiqueta.as_deref()),
            foto,
        })
    }
}
