//! Batch scheduling, batch lookups and cancellation

use std::sync::Arc;

use shared::{
    non_blank, parse_optional_id, parse_scheduled_date, validate_lot_weight,
    BatchDetailResponse, BatchQuery, BatchStatus, CancelRequest, CancelResponse, PendingBatch,
    PendingQuery, ScheduleCommand, ScheduleRequest,
};

use crate::error::{AppError, AppResult};
use crate::store::DataStore;

/// Scheduling service
#[derive(Clone)]
pub struct SchedulingService {
    store: Arc<dyn DataStore>,
}

fn required_consecutivo(query: &BatchQuery) -> AppResult<i32> {
    let consecutivo = parse_optional_id(query.consecutivo.as_deref())
        .map_err(|msg| AppError::invalid_field("consecutivo", msg))?;
    match consecutivo {
        Some(id) if id > 0 => Ok(id),
        Some(_) => Err(AppError::invalid_field("consecutivo", "must be a positive id")),
        None => Err(AppError::missing_field("consecutivo")),
    }
}

impl SchedulingService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Schedule `CantidadLotes` batches of a finished product.
    /// Returns the number of batches requested.
    pub async fn schedule(&self, input: ScheduleRequest) -> AppResult<i32> {
        let command = self.command(input).await?;

        self.store.schedule_batches(&command).await?;
        tracing::info!(
            "Scheduled {} batches of {} for {} (by {})",
            command.cantidad_lotes,
            command.codigo_producto,
            command.fecha_programada,
            command.usuario_programo
        );
        Ok(command.cantidad_lotes)
    }

    /// Open batches, optionally only those scheduled for `fecha`
    pub async fn pending(&self, query: PendingQuery) -> AppResult<Vec<PendingBatch>> {
        let fecha = match non_blank(query.fecha.as_deref()) {
            Some(raw) => Some(
                parse_scheduled_date(&raw).map_err(|msg| AppError::invalid_field("fecha", msg))?,
            ),
            None => None,
        };
        self.store.pending_batches(fecha).await
    }

    /// Detail lines of a batch with the highest sequence number
    pub async fn detail(&self, query: BatchQuery) -> AppResult<BatchDetailResponse> {
        let consecutivo = required_consecutivo(&query)?;
        let detalle = self.store.batch_detail(consecutivo).await?;
        let max_secuencia = detalle.iter().map(|l| l.secuencia).max().unwrap_or(0);

        Ok(BatchDetailResponse {
            detalle,
            max_secuencia,
        })
    }

    pub async fn status(&self, query: BatchQuery) -> AppResult<BatchStatus> {
        let consecutivo = required_consecutivo(&query)?;
        self.store
            .batch_status(consecutivo)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Batch {}", consecutivo)))
    }

    /// Soft-cancel one batch or an inclusive range of batches.
    /// Completed and already canceled batches are left as they are.
    pub async fn cancel(&self, input: CancelRequest) -> AppResult<CancelResponse> {
        let target = input
            .target()
            .map_err(|msg| AppError::invalid_field("Consecutivo", msg))?;

        let cancelados = self.store.cancel_batches(target).await?;
        if cancelados == 0 {
            return Err(AppError::NotFound("Open batch in the requested range".to_string()));
        }

        tracing::info!("Canceled {} batches ({:?})", cancelados, target);
        Ok(CancelResponse {
            mensaje: format!("{} lote(s) cancelado(s)", cancelados),
            cancelados,
        })
    }

    async fn command(&self, input: ScheduleRequest) -> AppResult<ScheduleCommand> {
        let codigo_producto = non_blank(input.codigo_producto.as_deref())
            .ok_or_else(|| AppError::missing_field("CodigoProducto"))?;
        let fecha_programada = input
            .fecha_programada
            .as_deref()
            .ok_or_else(|| AppError::missing_field("FechaProgramada"))
            .and_then(|raw| {
                parse_scheduled_date(raw)
                    .map_err(|msg| AppError::invalid_field("FechaProgramada", msg))
            })?;
        let usuario_programo = non_blank(input.usuario_programo.as_deref())
            .ok_or_else(|| AppError::missing_field("UsuarioProgramo"))?;
        let cantidad_lotes = input
            .cantidad_lotes
            .filter(|n| *n >= 1)
            .ok_or_else(|| AppError::invalid_field("CantidadLotes", "must be at least 1"))?;
        let peso_por_lote = input
            .peso_por_lote
            .ok_or_else(|| AppError::missing_field("PesoPorLote"))?;
        validate_lot_weight(peso_por_lote)
            .map_err(|msg| AppError::invalid_field("PesoPorLote", msg))?;

        let product = self.store.finished_product(&codigo_producto).await?;
        let codigo_producto = match product {
            Some(detail) => detail.producto.codigo_producto,
            None => {
                return Err(AppError::invalid_field(
                    "CodigoProducto",
                    format!("finished product {} does not exist", codigo_producto),
                ))
            }
        };

        if let Some(unit_id) = input.unidad_medida_id {
            if !self.store.unit_is_active(unit_id).await? {
                return Err(AppError::invalid_field(
                    "UnidadMedidaId",
                    format!("unit of measure {} is not active", unit_id),
                ));
            }
        }

        Ok(ScheduleCommand {
            codigo_producto,
            fecha_programada,
            usuario_programo,
            cantidad_lotes,
            peso_por_lote,
            unidad_medida_id: input.unidad_medida_id,
        })
    }
}
