//! Reference data: clients, categories, suppliers and units of measure

use std::sync::Arc;

use shared::{Category, ClientSummary, StatusFilter, Supplier, UnitOfMeasure};

use crate::error::{AppError, AppResult};
use crate::store::DataStore;

/// Catalog service
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn DataStore>,
}

/// Parse an `estado` query value into a filter
pub fn parse_status(raw: Option<&str>) -> AppResult<StatusFilter> {
    StatusFilter::parse(raw).map_err(|msg| AppError::invalid_field("estado", msg))
}

impl CatalogService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    pub async fn active_clients(&self) -> AppResult<Vec<ClientSummary>> {
        self.store.active_clients().await
    }

    pub async fn categories(&self) -> AppResult<Vec<Category>> {
        self.store.categories().await
    }

    pub async fn suppliers(&self, estado: Option<&str>) -> AppResult<Vec<Supplier>> {
        let estado = parse_status(estado)?;
        self.store.suppliers(estado).await
    }

    pub async fn active_units(&self) -> AppResult<Vec<UnitOfMeasure>> {
        self.store.active_units().await
    }
}
