//! Common types used across the service

use serde::{Deserialize, Serialize};

/// Active/inactive filter accepted by listing endpoints (`estado=`)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    Activo,
    Inactivo,
    #[default]
    Todos,
}

impl StatusFilter {
    /// Parse the `estado` query value. Absent or empty means no filter.
    pub fn parse(raw: Option<&str>) -> Result<Self, &'static str> {
        let value = match raw.map(str::trim) {
            None | Some("") => return Ok(StatusFilter::Todos),
            Some(v) => v.to_lowercase(),
        };

        match value.as_str() {
            "activo" | "activos" | "1" | "true" => Ok(StatusFilter::Activo),
            "inactivo" | "inactivos" | "0" | "false" => Ok(StatusFilter::Inactivo),
            "todos" | "all" => Ok(StatusFilter::Todos),
            _ => Err("estado must be one of: activo, inactivo, todos"),
        }
    }

    /// Value of the `Activo` bit this filter selects, if any
    pub fn as_bit(&self) -> Option<bool> {
        match self {
            StatusFilter::Activo => Some(true),
            StatusFilter::Inactivo => Some(false),
            StatusFilter::Todos => None,
        }
    }

    pub fn matches(&self, activo: bool) -> bool {
        self.as_bit().map_or(true, |bit| bit == activo)
    }
}

/// Ingredient reference as sent by the weighing stations.
///
/// Older scales send the id as a JSON string (`"5"`), newer ones as a number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum IngredientRef {
    Number(i64),
    Text(String),
}

impl IngredientRef {
    /// Resolve to a positive ingredient id
    pub fn id(&self) -> Result<i32, &'static str> {
        let id = match self {
            IngredientRef::Number(n) => i32::try_from(*n).map_err(|_| "Ingrediente out of range")?,
            IngredientRef::Text(s) => s
                .trim()
                .parse::<i32>()
                .map_err(|_| "Ingrediente must be a numeric id")?,
        };

        if id <= 0 {
            return Err("Ingrediente must be a positive id");
        }
        Ok(id)
    }
}

/// Store mode selected at startup
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreMode {
    /// Live SQL Server connection
    Live,
    /// In-memory fixture data (mock mode)
    Fixture,
}

impl std::fmt::Display for StoreMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreMode::Live => write!(f, "live"),
            StoreMode::Fixture => write!(f, "fixture"),
        }
    }
}
