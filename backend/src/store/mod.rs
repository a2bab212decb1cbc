//! Data store capability
//!
//! Handlers and services only see [`DataStore`]. The implementation is picked
//! once at startup: [`MssqlStore`] when SQL Server credentials are configured,
//! [`FixtureStore`] (mock mode) otherwise.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

use shared::{
    BatchDetailLine, BatchStatus, CancelTarget, Category, ClientSummary, FinishedProduct,
    FinishedProductDetail, FinishedProductDraft, IngredientDraft, IngredientFilter,
    IngredientListing, PendingBatch, ProductFilter, ScheduleCommand, StatusFilter, StoreMode,
    Supplier, UnitOfMeasure, UserCredentials, WeighIn, WeighOutcome,
};

use crate::config::DatabaseConfig;
use crate::error::AppResult;

pub mod fixture;
pub mod mssql;
pub mod weighing;

pub use fixture::FixtureStore;
pub use mssql::MssqlStore;

/// Everything the service reads from or writes to the production database
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Which implementation is serving requests
    fn mode(&self) -> StoreMode;

    /// Whether the backing database answers right now
    async fn is_connected(&self) -> bool;

    // Users

    async fn find_user(&self, username: &str) -> AppResult<Option<UserCredentials>>;

    // Reference data

    async fn active_clients(&self) -> AppResult<Vec<ClientSummary>>;

    async fn categories(&self) -> AppResult<Vec<Category>>;

    async fn suppliers(&self, estado: StatusFilter) -> AppResult<Vec<Supplier>>;

    async fn active_units(&self) -> AppResult<Vec<UnitOfMeasure>>;

    async fn unit_is_active(&self, id: i32) -> AppResult<bool>;

    // Ingredients

    async fn list_ingredients(&self, filter: &IngredientFilter) -> AppResult<Vec<IngredientListing>>;

    /// Whether an ingredient other than `exclude_id` already uses `nombre`
    async fn ingredient_name_taken(&self, nombre: &str, exclude_id: Option<i32>) -> AppResult<bool>;

    async fn ingredient_exists(&self, id: i32) -> AppResult<bool>;

    /// Insert an ingredient and return its id
    async fn create_ingredient(&self, draft: &IngredientDraft) -> AppResult<i32>;

    /// Returns `false` when no ingredient has `id`
    async fn update_ingredient(&self, id: i32, draft: &IngredientDraft) -> AppResult<bool>;

    // Finished products

    async fn list_finished_products(&self, filter: &ProductFilter) -> AppResult<Vec<FinishedProduct>>;

    async fn finished_product(&self, codigo: &str) -> AppResult<Option<FinishedProductDetail>>;

    /// Insert the header and its recipe lines atomically
    async fn register_finished_product(&self, draft: &FinishedProductDraft) -> AppResult<()>;

    /// Update the header and replace all recipe lines atomically.
    /// Returns `false` when the product does not exist.
    async fn edit_finished_product(&self, draft: &FinishedProductDraft) -> AppResult<bool>;

    // Batches

    /// Create batches, control rows and detail lines for a scheduling request
    async fn schedule_batches(&self, command: &ScheduleCommand) -> AppResult<()>;

    /// Non-canceled, non-completed batches, optionally for one scheduled date
    async fn pending_batches(&self, fecha: Option<NaiveDate>) -> AppResult<Vec<PendingBatch>>;

    /// Detail lines of a batch ordered by sequence
    async fn batch_detail(&self, consecutivo: i32) -> AppResult<Vec<BatchDetailLine>>;

    async fn batch_status(&self, consecutivo: i32) -> AppResult<Option<BatchStatus>>;

    /// Soft-cancel open batches, returning how many were canceled
    async fn cancel_batches(&self, target: CancelTarget) -> AppResult<u64>;

    // Weighing

    /// Run the weighing workflow atomically
    async fn record_weigh(&self, weigh: &WeighIn) -> AppResult<WeighOutcome>;
}

/// Select the store for this process from the database configuration
pub fn from_config(config: &DatabaseConfig) -> anyhow::Result<Arc<dyn DataStore>> {
    match config.credentials() {
        Some(credentials) => {
            tracing::info!(
                "Using SQL Server store at {}:{} (database {})",
                credentials.host,
                config.port,
                credentials.database
            );
            let store = MssqlStore::connect(config, &credentials)?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("Database credentials not configured, serving fixture data (mock mode)");
            Ok(Arc::new(FixtureStore::seeded()))
        }
    }
}
