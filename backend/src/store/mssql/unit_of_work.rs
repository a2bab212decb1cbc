//! Explicit transactions over a pooled tiberius client
//!
//! A unit of work is a typed group of statements that commits or rolls back
//! as a whole. Transaction control goes through `simple_query` so it is not
//! wrapped in `sp_executesql` and the transaction count stays balanced.

use async_trait::async_trait;
use bb8::ManageConnection;
use bb8_tiberius::ConnectionManager;

use crate::error::AppResult;

/// Client handed out by the pool
pub(crate) type DbClient = <ConnectionManager as ManageConnection>::Connection;

/// Statements that must be applied atomically
#[async_trait]
pub(crate) trait UnitOfWork: Send + Sync {
    type Output: Send;

    async fn run(&self, client: &mut DbClient) -> AppResult<Self::Output>;
}

/// Run `unit` inside a transaction.
///
/// Commits when the unit succeeds. On error the transaction is rolled back and
/// the unit's error is returned; a failed rollback is only logged.
pub(crate) async fn execute<U>(client: &mut DbClient, unit: &U) -> AppResult<U::Output>
where
    U: UnitOfWork,
{
    client
        .simple_query("SET XACT_ABORT ON; BEGIN TRANSACTION")
        .await?
        .into_results()
        .await?;

    match unit.run(client).await {
        Ok(output) => {
            client
                .simple_query("COMMIT TRANSACTION")
                .await?
                .into_results()
                .await?;
            Ok(output)
        }
        Err(err) => {
            if let Err(rollback_err) = rollback(client).await {
                tracing::warn!("Rollback failed after {}: {}", err, rollback_err);
            }
            Err(err)
        }
    }
}

async fn rollback(client: &mut DbClient) -> AppResult<()> {
    client
        .simple_query("IF @@TRANCOUNT > 0 ROLLBACK TRANSACTION")
        .await?
        .into_results()
        .await?;
    Ok(())
}
