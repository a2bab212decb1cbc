//! Finished products and their ingredient-percentage recipes

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::StatusFilter;

/// Finished product header
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct FinishedProduct {
    pub codigo_producto: String,
    pub nombre: String,
    pub cliente_id: Option<i32>,
    /// Client name
    pub cliente: Option<String>,
    pub descripcion: Option<String>,
    pub activo: bool,
}

/// One ingredient of a finished product's recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct RecipeLine {
    /// 1-based position in the recipe
    pub secuencia: i32,
    pub ingrediente_id: i32,
    /// Ingredient name
    pub ingrediente: Option<String>,
    pub porcentaje: Decimal,
}

/// Finished product with its recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct FinishedProductDetail {
    #[serde(flatten)]
    pub producto: FinishedProduct,
    pub ingredientes: Vec<RecipeLine>,
}

/// Body of the finished-product registration and edit endpoints.
///
/// `CodigoProducto` is required on registration; on edit the code comes from
/// the path and a body value is ignored.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct FinishedProductRequest {
    #[validate(length(min = 1, max = 50))]
    pub codigo_producto: Option<String>,

    #[validate(required, length(min = 1, max = 150))]
    pub nombre: Option<String>,

    #[validate(range(min = 1))]
    pub cliente_id: Option<i32>,

    #[validate(length(max = 255))]
    pub descripcion: Option<String>,

    pub activo: Option<bool>,

    #[validate(required, length(min = 1))]
    pub ingredientes: Option<Vec<RecipeLineInput>>,
}

/// Recipe line as sent by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecipeLineInput {
    pub ingrediente_id: Option<i32>,
    pub porcentaje: Option<Decimal>,
}

/// Validated finished product ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedProductDraft {
    pub codigo_producto: String,
    pub nombre: String,
    pub cliente_id: Option<i32>,
    pub descripcion: Option<String>,
    pub activo: bool,
    /// Recipe in caller order; sequence numbers are assigned on insert
    pub ingredientes: Vec<RecipeLineDraft>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecipeLineDraft {
    pub ingrediente_id: i32,
    pub porcentaje: Decimal,
}

/// Query string of the finished-product listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    pub nombre: Option<String>,
    #[serde(rename = "clienteId")]
    pub cliente_id: Option<String>,
    pub estado: Option<String>,
}

/// Parsed finished-product listing filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub nombre: Option<String>,
    pub cliente_id: Option<i32>,
    pub estado: StatusFilter,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(ingredientes: Option<Vec<RecipeLineInput>>) -> FinishedProductRequest {
        FinishedProductRequest {
            codigo_producto: Some("PT-1".to_string()),
            nombre: Some("Mezcla".to_string()),
            cliente_id: None,
            descripcion: None,
            activo: None,
            ingredientes,
        }
    }

    #[test]
    fn test_recipe_lines_are_required() {
        for ingredientes in [None, Some(Vec::new())] {
            let errors = request(ingredientes).validate().unwrap_err();
            assert!(errors.field_errors().contains_key("ingredientes"));
        }

        let line = RecipeLineInput {
            ingrediente_id: Some(1),
            porcentaje: Some(Decimal::from(100)),
        };
        assert!(request(Some(vec![line])).validate().is_ok());
    }
}
