//! Scheduled batches: scheduling, lookups, cancellation and weighing

use async_trait::async_trait;
use chrono::NaiveDate;
use tiberius::{Query, Row};

use shared::{
    BatchDetailLine, BatchStatus, CancelTarget, PendingBatch, PendingLine, ScheduleCommand,
    WeighIn, WeighOutcome,
};

use super::rows::{get, numeric, require, require_text, text};
use super::unit_of_work::{execute, DbClient, UnitOfWork};
use super::MssqlStore;
use crate::error::AppResult;
use crate::store::weighing::{record_weigh, WeighingSteps};

fn detail_line_from_row(row: &Row) -> AppResult<BatchDetailLine> {
    Ok(BatchDetailLine {
        consecutivo: require(row, "Consecutivo")?,
        producto_terminado: require_text(row, "ProductoTerminado")?,
        secuencia: require(row, "Secuencia")?,
        ingrediente_id: require(row, "IngredienteId")?,
        ingrediente: text(row, "Ingrediente")?,
        peso_objetivo: require(row, "PesoObjetivo")?,
        porcentaje: require(row, "Porcentaje")?,
        tara: get(row, "Tara")?,
        peso: get(row, "Peso")?,
        tiempo_de_pesado: get(row, "TiempoDePesado")?,
        etiqueta: text(row, "Etiqueta")?,
        tiene_foto: get(row, "TieneFoto")?.unwrap_or(false),
    })
}

fn pending_batch_from_row(row: &Row) -> AppResult<PendingBatch> {
    Ok(PendingBatch {
        consecutivo: require(row, "Consecutivo")?,
        producto_terminado: require_text(row, "ProductoTerminado")?,
        producto: text(row, "Producto")?,
        lote: require_text(row, "Lote")?,
        fecha_programada: get(row, "FechaProgramada")?,
        linea_mezclado: text(row, "LineaMezclado")?,
        lineas_pendientes: require(row, "LineasPendientes")?,
        total_lineas: require(row, "TotalLineas")?,
    })
}

fn status_from_row(row: &Row) -> AppResult<BatchStatus> {
    Ok(BatchStatus {
        consecutivo: require(row, "Consecutivo")?,
        producto_terminado: require_text(row, "ProductoTerminado")?,
        lote: require_text(row, "Lote")?,
        cancelado: get(row, "Cancelado")?.unwrap_or(false),
        fecha_programada: get(row, "FechaProgramada")?,
        linea_mezclado: text(row, "LineaMezclado")?,
        produccion_inicio: get(row, "ProduccionInicio")?,
        produccion_final: get(row, "ProduccionFinal")?,
        lote_completado: get(row, "LoteCompletado")?.unwrap_or(false),
        lineas_pendientes: require(row, "LineasPendientes")?,
    })
}

/// Weighing steps as statements on one client inside a transaction
struct SqlWeighing<'c> {
    client: &'c mut DbClient,
}

#[async_trait]
impl WeighingSteps for SqlWeighing<'_> {
    async fn update_line(&mut self, weigh: &WeighIn) -> AppResult<u64> {
        let mut update = Query::new(
            r#"
            UPDATE d
            SET d.Tara = @P5, d.Peso = @P6, d.TiempoDePesado = SYSDATETIME(),
                d.Etiqueta = @P7, d.Foto = @P8
            FROM dbo.ProgramacionProduccion_Detalle d
            JOIN dbo.ProgramacionProduccion p ON p.Consecutivo = d.Consecutivo
            WHERE d.Consecutivo = @P1 AND d.ProductoTerminado = @P2
              AND d.Secuencia = @P3 AND d.IngredienteId = @P4
              AND p.Cancelado = 0
            "#,
        );
        update.bind(weigh.consecutivo);
        update.bind(weigh.producto_terminado.as_str());
        update.bind(weigh.secuencia);
        update.bind(weigh.ingrediente_id);
        update.bind(numeric(weigh.tara));
        update.bind(numeric(weigh.peso));
        update.bind(weigh.etiqueta.as_deref());
        update.bind(weigh.foto.clone());

        Ok(update.execute(&mut *self.client).await?.total())
    }

    async fn stamp_production_start(&mut self, consecutivo: i32) -> AppResult<()> {
        let mut update = Query::new(
            r#"
            UPDATE dbo.ProgramacionProduccion_Control
            SET ProduccionInicio = SYSDATETIME()
            WHERE Consecutivo = @P1 AND ProduccionInicio IS NULL
            "#,
        );
        update.bind(consecutivo);
        update.execute(&mut *self.client).await?;
        Ok(())
    }

    async fn count_pending(&mut self, consecutivo: i32) -> AppResult<i32> {
        let mut count = Query::new(
            r#"
            SELECT COUNT(*) AS Pendientes
            FROM dbo.ProgramacionProduccion_Detalle
            WHERE Consecutivo = @P1 AND TiempoDePesado IS NULL
            "#,
        );
        count.bind(consecutivo);
        match count.query(&mut *self.client).await?.into_row().await? {
            Some(row) => require(&row, "Pendientes"),
            None => Ok(0),
        }
    }

    async fn mark_completed(&mut self, consecutivo: i32) -> AppResult<()> {
        let mut update = Query::new(
            r#"
            UPDATE dbo.ProgramacionProduccion_Control
            SET ProduccionFinal = SYSDATETIME(), LoteCompletado = 1
            WHERE Consecutivo = @P1
            "#,
        );
        update.bind(consecutivo);
        update.execute(&mut *self.client).await?;
        Ok(())
    }

    async fn next_pending(&mut self, consecutivo: i32) -> AppResult<Option<PendingLine>> {
        let mut next = Query::new(
            r#"
            SELECT TOP 1 d.Secuencia, d.IngredienteId, i.Nombre AS Ingrediente,
                   d.PesoObjetivo, d.Porcentaje
            FROM dbo.ProgramacionProduccion_Detalle d
            LEFT JOIN dbo.Ingredientes i ON i.Id = d.IngredienteId
            WHERE d.Consecutivo = @P1 AND d.TiempoDePesado IS NULL
            ORDER BY d.Secuencia
            "#,
        );
        next.bind(consecutivo);
        let row = match next.query(&mut *self.client).await?.into_row().await? {
            Some(row) => row,
            None => return Ok(None),
        };

        Ok(Some(PendingLine {
            secuencia: require(&row, "Secuencia")?,
            ingrediente_id: require(&row, "IngredienteId")?,
            ingrediente: text(&row, "Ingrediente")?,
            peso_objetivo: require(&row, "PesoObjetivo")?,
            porcentaje: require(&row, "Porcentaje")?,
        }))
    }
}

/// One weigh-in as a transaction
struct WeighUnit<'a> {
    weigh: &'a WeighIn,
}

#[async_trait]
impl UnitOfWork for WeighUnit<'_> {
    type Output = WeighOutcome;

    async fn run(&self, client: &mut DbClient) -> AppResult<WeighOutcome> {
        record_weigh(&mut SqlWeighing { client }, self.weigh).await
    }
}

impl MssqlStore {
    pub(super) async fn run_schedule(&self, command: &ScheduleCommand) -> AppResult<()> {
        let mut exec = Query::new(
            r#"
            EXEC dbo.sp_ProgramarLotes
                @CodigoProducto = @P1,
                @FechaProgramada = @P2,
                @UsuarioProgramo = @P3,
                @CantidadLotes = @P4,
                @PesoPorLote = @P5,
                @UnidadMedidaId = @P6
            "#,
        );
        exec.bind(command.codigo_producto.as_str());
        exec.bind(command.fecha_programada);
        exec.bind(command.usuario_programo.as_str());
        exec.bind(command.cantidad_lotes);
        exec.bind(numeric(command.peso_por_lote));
        exec.bind(command.unidad_medida_id);

        let mut conn = self.pool.get().await?;
        exec.execute(&mut *conn).await?;
        Ok(())
    }

    pub(super) async fn query_pending_batches(
        &self,
        fecha: Option<NaiveDate>,
    ) -> AppResult<Vec<PendingBatch>> {
        let mut sql = String::from(
            r#"
            SELECT p.Consecutivo, p.CodigoProducto AS ProductoTerminado,
                   pt.Nombre AS Producto, p.Lote, c.FechaProgramada, c.LineaMezclado,
                   (SELECT COUNT(*) FROM dbo.ProgramacionProduccion_Detalle d
                     WHERE d.Consecutivo = p.Consecutivo AND d.TiempoDePesado IS NULL) AS LineasPendientes,
                   (SELECT COUNT(*) FROM dbo.ProgramacionProduccion_Detalle d
                     WHERE d.Consecutivo = p.Consecutivo) AS TotalLineas
            FROM dbo.ProgramacionProduccion p
            JOIN dbo.ProgramacionProduccion_Control c ON c.Consecutivo = p.Consecutivo
            LEFT JOIN dbo.ProductosTerminados pt ON pt.CodigoProducto = p.CodigoProducto
            WHERE p.Cancelado = 0 AND ISNULL(c.LoteCompletado, 0) = 0
            "#,
        );
        if fecha.is_some() {
            sql.push_str(" AND c.FechaProgramada = @P1");
        }
        sql.push_str(" ORDER BY c.FechaProgramada, p.Consecutivo");

        let mut query = Query::new(sql);
        if let Some(fecha) = fecha {
            query.bind(fecha);
        }

        let mut conn = self.pool.get().await?;
        let rows = query.query(&mut *conn).await?.into_first_result().await?;
        rows.iter().map(pending_batch_from_row).collect()
    }

    pub(super) async fn query_batch_detail(&self, consecutivo: i32) -> AppResult<Vec<BatchDetailLine>> {
        let mut query = Query::new(
            r#"
            SELECT d.Consecutivo, d.ProductoTerminado, d.Secuencia, d.IngredienteId,
                   i.Nombre AS Ingrediente, d.PesoObjetivo, d.Porcentaje, d.Tara, d.Peso,
                   d.TiempoDePesado, d.Etiqueta,
                   CAST(CASE WHEN d.Foto IS NULL THEN 0 ELSE 1 END AS BIT) AS TieneFoto
            FROM dbo.ProgramacionProduccion_Detalle d
            LEFT JOIN dbo.Ingredientes i ON i.Id = d.IngredienteId
            WHERE d.Consecutivo = @P1
            ORDER BY d.Secuencia
            "#,
        );
        query.bind(consecutivo);

        let mut conn = self.pool.get().await?;
        let rows = query.query(&mut *conn).await?.into_first_result().await?;
        rows.iter().map(detail_line_from_row).collect()
    }

    pub(super) async fn query_batch_status(&self, consecutivo: i32) -> AppResult<Option<BatchStatus>> {
        let mut query = Query::new(
            r#"
            SELECT p.Consecutivo, p.CodigoProducto AS ProductoTerminado, p.Lote, p.Cancelado,
                   c.FechaProgramada, c.LineaMezclado, c.ProduccionInicio, c.ProduccionFinal,
                   CAST(ISNULL(c.LoteCompletado, 0) AS BIT) AS LoteCompletado,
                   (SELECT COUNT(*) FROM dbo.ProgramacionProduccion_Detalle d
                     WHERE d.Consecutivo = p.Consecutivo AND d.TiempoDePesado IS NULL) AS LineasPendientes
            FROM dbo.ProgramacionProduccion p
            LEFT JOIN dbo.ProgramacionProduccion_Control c ON c.Consecutivo = p.Consecutivo
            WHERE p.Consecutivo = @P1
            "#,
        );
        query.bind(consecutivo);

        let mut conn = self.pool.get().await?;
        let row = query.query(&mut *conn).await?.into_row().await?;
        let status = match row {
            Some(row) => Some(status_from_row(&row)?),
            None => None,
        };
        Ok(status)
    }

    pub(super) async fn soft_cancel(&self, target: CancelTarget) -> AppResult<u64> {
        let (from, to) = target.bounds();
        let mut update = Query::new(
            r#"
            UPDATE p
            SET p.Cancelado = 1
            FROM dbo.ProgramacionProduccion p
            LEFT JOIN dbo.ProgramacionProduccion_Control c ON c.Consecutivo = p.Consecutivo
            WHERE p.Consecutivo BETWEEN @P1 AND @P2
              AND p.Cancelado = 0
              AND ISNULL(c.LoteCompletado, 0) = 0
            "#,
        );
        update.bind(from);
        update.bind(to);

        let mut conn = self.pool.get().await?;
        Ok(update.execute(&mut *conn).await?.total())
    }

    pub(super) async fn run_weigh(&self, weigh: &WeighIn) -> AppResult<WeighOutcome> {
        let mut conn = self.pool.get().await?;
        execute(&mut *conn, &WeighUnit { weigh }).await
    }
}
