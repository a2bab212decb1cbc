//! Ingredient master data

use std::sync::Arc;

use shared::{
    non_blank, normalize_name, parse_optional_id, IngredientDraft, IngredientFilter,
    IngredientListing, IngredientQuery, IngredientRequest,
};

use crate::error::{AppError, AppResult};
use crate::services::catalog::parse_status;
use crate::store::DataStore;

/// Ingredient service
#[derive(Clone)]
pub struct IngredientService {
    store: Arc<dyn DataStore>,
}

fn name_conflict() -> AppError {
    AppError::Conflict {
        resource: "Nombre".to_string(),
        message: "An ingredient with this name already exists".to_string(),
        message_es: "Ya existe un ingrediente con este nombre".to_string(),
    }
}

impl IngredientService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// List ingredients in store order (by name)
    pub async fn list(&self, query: IngredientQuery) -> AppResult<Vec<IngredientListing>> {
        let filter = IngredientFilter {
            nombre: non_blank(query.nombre.as_deref()),
            categoria_id: parse_optional_id(query.categoria_id.as_deref())
                .map_err(|msg| AppError::invalid_field("categoriaId", msg))?,
            estado: parse_status(query.estado.as_deref())?,
        };
        self.store.list_ingredients(&filter).await
    }

    /// Create an ingredient, returning its id
    pub async fn create(&self, input: IngredientRequest) -> AppResult<i32> {
        let draft = self.draft(input).await?;

        if self.store.ingredient_name_taken(&draft.nombre, None).await? {
            return Err(name_conflict());
        }

        let id = self.store.create_ingredient(&draft).await?;
        tracing::info!("Created ingredient {} ({})", id, draft.nombre);
        Ok(id)
    }

    /// Update an ingredient. Keeping its own name is not a conflict.
    pub async fn update(&self, id: i32, input: IngredientRequest) -> AppResult<()> {
        if id <= 0 {
            return Err(AppError::invalid_field("Id", "must be a positive id"));
        }
        let draft = self.draft(input).await?;

        if self.store.ingredient_name_taken(&draft.nombre, Some(id)).await? {
            return Err(name_conflict());
        }

        if !self.store.update_ingredient(id, &draft).await? {
            return Err(AppError::NotFound(format!("Ingredient {}", id)));
        }

        tracing::info!("Updated ingredient {} ({})", id, draft.nombre);
        Ok(())
    }

    async fn draft(&self, input: IngredientRequest) -> AppResult<IngredientDraft> {
        let nombre = input
            .nombre
            .as_deref()
            .map(normalize_name)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::missing_field("Nombre"))?;
        let categoria_id = input
            .categoria_id
            .ok_or_else(|| AppError::missing_field("CategoriaId"))?;
        let activo = input.activo.ok_or_else(|| AppError::missing_field("Activo"))?;

        let categories = self.store.categories().await?;
        if !categories.iter().any(|c| c.id == categoria_id) {
            return Err(AppError::invalid_field(
                "CategoriaId",
                format!("category {} does not exist", categoria_id),
            ));
        }

        Ok(IngredientDraft {
            nombre,
            descripcion: non_blank(input.descripcion.as_deref()),
            categoria_id,
            activo,
        })
    }
}
