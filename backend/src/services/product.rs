//! Finished products and their recipes

use std::sync::Arc;

use shared::{
    non_blank, normalize_name, parse_optional_id, validate_recipe_percentages,
    validate_unique_ingredients, FinishedProduct, FinishedProductDetail, FinishedProductDraft,
    FinishedProductRequest, ProductFilter, ProductQuery, RecipeLineDraft,
};

use crate::error::{AppError, AppResult};
use crate::services::catalog::parse_status;
use crate::store::DataStore;

/// Finished product service
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn DataStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, query: ProductQuery) -> AppResult<Vec<FinishedProduct>> {
        let filter = ProductFilter {
            nombre: non_blank(query.nombre.as_deref()),
            cliente_id: parse_optional_id(query.cliente_id.as_deref())
                .map_err(|msg| AppError::invalid_field("clienteId", msg))?,
            estado: parse_status(query.estado.as_deref())?,
        };
        self.store.list_finished_products(&filter).await
    }

    pub async fn get(&self, codigo: &str) -> AppResult<FinishedProductDetail> {
        self.store
            .finished_product(codigo.trim())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Finished product {}", codigo.trim())))
    }

    /// Register a product with its recipe
    pub async fn register(&self, input: FinishedProductRequest) -> AppResult<String> {
        let codigo = non_blank(input.codigo_producto.as_deref())
            .ok_or_else(|| AppError::missing_field("CodigoProducto"))?;
        let draft = self.draft(codigo, input).await?;

        if self.store.finished_product(&draft.codigo_producto).await?.is_some() {
            return Err(AppError::Conflict {
                resource: "CodigoProducto".to_string(),
                message: format!("Finished product {} already exists", draft.codigo_producto),
                message_es: format!("El producto terminado {} ya existe", draft.codigo_producto),
            });
        }

        self.store.register_finished_product(&draft).await?;
        tracing::info!(
            "Registered finished product {} with {} ingredients",
            draft.codigo_producto,
            draft.ingredientes.len()
        );
        Ok(draft.codigo_producto)
    }

    /// Update the header of `codigo` and replace its recipe
    pub async fn edit(&self, codigo: &str, input: FinishedProductRequest) -> AppResult<()> {
        let codigo =
            non_blank(Some(codigo)).ok_or_else(|| AppError::missing_field("CodigoProducto"))?;
        let draft = self.draft(codigo, input).await?;

        if !self.store.edit_finished_product(&draft).await? {
            return Err(AppError::NotFound(format!(
                "Finished product {}",
                draft.codigo_producto
            )));
        }

        tracing::info!("Edited finished product {}", draft.codigo_producto);
        Ok(())
    }

    async fn draft(
        &self,
        codigo_producto: String,
        input: FinishedProductRequest,
    ) -> AppResult<FinishedProductDraft> {
        let nombre = input
            .nombre
            .as_deref()
            .map(normalize_name)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::missing_field("Nombre"))?;

        let lines = input
            .ingredientes
            .ok_or_else(|| AppError::missing_field("Ingredientes"))?;

        let mut ingredientes = Vec::with_capacity(lines.len());
        for line in lines {
            let ingrediente_id = line
                .ingrediente_id
                .filter(|id| *id > 0)
                .ok_or_else(|| {
                    AppError::invalid_field("Ingredientes", "every line needs a positive IngredienteId")
                })?;
            let porcentaje = line
                .porcentaje
                .ok_or_else(|| {
                    AppError::invalid_field("Ingredientes", "every line needs a Porcentaje")
                })?;
            ingredientes.push(RecipeLineDraft {
                ingrediente_id,
                porcentaje,
            });
        }

        let ids: Vec<i32> = ingredientes.iter().map(|l| l.ingrediente_id).collect();
        validate_unique_ingredients(&ids)
            .map_err(|msg| AppError::invalid_field("Ingredientes", msg))?;

        let percentages: Vec<_> = ingredientes.iter().map(|l| l.porcentaje).collect();
        validate_recipe_percentages(&percentages)
            .map_err(|msg| AppError::invalid_field("Ingredientes", msg))?;

        for id in &ids {
            if !self.store.ingredient_exists(*id).await? {
                return Err(AppError::invalid_field(
                    "Ingredientes",
                    format!("ingredient {} does not exist", id),
                ));
            }
        }

        Ok(FinishedProductDraft {
            codigo_producto,
            nombre,
            cliente_id: input.cliente_id,
            descripcion: non_blank(input.descripcion.as_deref()),
            activo: input.activo.unwrap_or(true),
            ingredientes,
        })
    }
}
