//! Batch weighing workflow
//!
//! The five steps of a weigh-in are expressed once, over [`WeighingSteps`].
//! Each store supplies the steps and runs [`record_weigh`] inside its own
//! atomic scope (a SQL transaction, or a draft copy of the fixture data), so a
//! failed step never leaves a weight behind without its state transitions.

use async_trait::async_trait;
use shared::{PendingLine, WeighIn, WeighOutcome};

use crate::error::{AppError, AppResult};

/// Store operations the weighing workflow is built from
#[async_trait]
pub trait WeighingSteps: Send {
    /// Write tare, weight, timestamp, label and photo on the matching line of a
    /// non-canceled batch. Returns the number of lines updated.
    ///
    /// Lines that were already weighed still match: a repeated weigh-in
    /// overwrites the earlier reading.
    async fn update_line(&mut self, weigh: &WeighIn) -> AppResult<u64>;

    /// Stamp the production start of a batch unless it is already set
    async fn stamp_production_start(&mut self, consecutivo: i32) -> AppResult<()>;

    /// Number of lines of the batch without a weigh timestamp
    async fn count_pending(&mut self, consecutivo: i32) -> AppResult<i32>;

    /// Stamp the production end and flag the batch as completed
    async fn mark_completed(&mut self, consecutivo: i32) -> AppResult<()>;

    /// Pending line with the lowest sequence
    async fn next_pending(&mut self, consecutivo: i32) -> AppResult<Option<PendingLine>>;
}

/// Run one weigh-in against `steps`.
///
/// The caller owns the atomic scope: on `Err` everything done through
/// `steps` must be discarded.
pub async fn record_weigh<S>(steps: &mut S, weigh: &WeighIn) -> AppResult<WeighOutcome>
where
    S: WeighingSteps + ?Sized,
{
    let updated = steps.update_line(weigh).await?;
    if updated == 0 {
        return Err(AppError::NotFound(format!(
            "Detail line (batch {}, product {}, sequence {}, ingredient {})",
            weigh.consecutivo, weigh.producto_terminado, weigh.secuencia, weigh.ingrediente_id
        )));
    }

    if weigh.secuencia == 1 {
        steps.stamp_production_start(weigh.consecutivo).await?;
    }

    let remaining = steps.count_pending(weigh.consecutivo).await?;
    if remaining == 0 {
        steps.mark_completed(weigh.consecutivo).await?;
        return Ok(WeighOutcome {
            remaining: 0,
            completed: true,
            next: None,
        });
    }

    let next = steps.next_pending(weigh.consecutivo).await?;
    Ok(WeighOutcome {
        remaining,
        completed: false,
        next,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    /// Scripted steps recording the order in which they were called
    struct Scripted {
        updated: u64,
        pending: i32,
        calls: Vec<&'static str>,
    }

    #[async_trait]
    impl WeighingSteps for Scripted {
        async fn update_line(&mut self, _weigh: &WeighIn) -> AppResult<u64> {
            self.calls.push("update");
            Ok(self.updated)
        }

        async fn stamp_production_start(&mut self, _consecutivo: i32) -> AppResult<()> {
            self.calls.push("start");
            Ok(())
        }

        async fn count_pending(&mut self, _consecutivo: i32) -> AppResult<i32> {
            self.calls.push("count");
            Ok(self.pending)
        }

        async fn mark_completed(&mut self, _consecutivo: i32) -> AppResult<()> {
            self.calls.push("complete");
            Ok(())
        }

        async fn next_pending(&mut self, _consecutivo: i32) -> AppResult<Option<PendingLine>> {
            self.calls.push("next");
            Ok(Some(PendingLine {
                secuencia: 2,
                ingrediente_id: 7,
                ingrediente: Some("Sal".to_string()),
                peso_objetivo: Decimal::new(150, 2),
                porcentaje: Decimal::new(15, 1),
            }))
        }
    }

    fn weigh(secuencia: i32) -> WeighIn {
        WeighIn {
            consecutivo: 10,
            producto_terminado: "PT-001".to_string(),
            secuencia,
            ingrediente_id: 5,
            tara: Decimal::new(2, 1),
            peso: Decimal::new(105, 1),
            etiqueta: None,
            foto: None,
        }
    }

    #[tokio::test]
    async fn test_unmatched_line_stops_after_update() {
        let mut steps = Scripted { updated: 0, pending: 3, calls: vec![] };
        let result = record_weigh(&mut steps, &weigh(1)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(steps.calls, vec!["update"]);
    }

    #[tokio::test]
    async fn test_first_sequence_stamps_start() {
        let mut steps = Scripted { updated: 1, pending: 2, calls: vec![] };
        let outcome = record_weigh(&mut steps, &weigh(1)).await.unwrap();
        assert_eq!(steps.calls, vec!["update", "start", "count", "next"]);
        assert!(!outcome.completed);
        assert_eq!(outcome.remaining, 2);
        assert_eq!(outcome.next.map(|n| n.secuencia), Some(2));
    }

    #[tokio::test]
    async fn test_last_line_completes_without_next() {
        let mut steps = Scripted { updated: 1, pending: 0, calls: vec![] };
        let outcome = record_weigh(&mut steps, &weigh(3)).await.unwrap();
        assert_eq!(steps.calls, vec!["update", "count", "complete"]);
        assert!(outcome.completed);
        assert_eq!(outcome.remaining, 0);
        assert!(outcome.next.is_none());
    }
}
