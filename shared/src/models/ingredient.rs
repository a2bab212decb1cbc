//! Ingredient master data

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::StatusFilter;

/// Ingredient row as returned by `/api/Ingredientes/listado`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct IngredientListing {
    pub id: i32,
    pub nombre: String,
    pub activo: bool,
    /// Category name
    pub categoria: Option<String>,
    pub descripcion: Option<String>,
}

/// Body of `POST /api/Ingredientes/nuevo` and `PUT /api/Ingredientes/actualizar/:id`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct IngredientRequest {
    #[validate(required, length(min = 1, max = 100))]
    pub nombre: Option<String>,

    #[validate(length(max = 255))]
    pub descripcion: Option<String>,

    #[validate(required, range(min = 1))]
    pub categoria_id: Option<i32>,

    #[validate(required)]
    pub activo: Option<bool>,
}

/// Validated ingredient fields ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientDraft {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub categoria_id: i32,
    pub activo: bool,
}

/// Query string of the ingredient listing.
/// Ids arrive as text so a blank form field can mean "no filter".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngredientQuery {
    pub nombre: Option<String>,
    #[serde(rename = "categoriaId")]
    pub categoria_id: Option<String>,
    pub estado: Option<String>,
}

/// Parsed ingredient listing filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngredientFilter {
    /// Name substring
    pub nombre: Option<String>,
    pub categoria_id: Option<i32>,
    pub estado: StatusFilter,
}
