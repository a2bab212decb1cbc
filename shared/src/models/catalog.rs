//! Reference data: clients, categories, suppliers, units of measure

use serde::{Deserialize, Serialize};

/// Active client as listed by `/api/Clientes/activos`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientSummary {
    pub identificador: i32,
    pub cliente: String,
}

/// Ingredient category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Category {
    pub id: i32,
    pub nombre: String,
}

/// Raw-material supplier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Supplier {
    pub id: i32,
    pub nombre: String,
    pub contacto: Option<String>,
    pub telefono: Option<String>,
    pub activo: bool,
}

/// Unit of measure used when scheduling batches
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct UnitOfMeasure {
    pub id: i32,
    pub nombre: String,
    pub abreviatura: String,
    pub activo: bool,
}
