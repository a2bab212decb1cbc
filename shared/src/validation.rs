//! Validation utilities for the Plant Scheduling service

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::HashSet;

// ============================================================================
// Recipe Validations
// ============================================================================

/// Validate recipe percentages are positive and sum to 100
pub fn validate_recipe_percentages(percentages: &[Decimal]) -> Result<(), &'static str> {
    if percentages.is_empty() {
        return Err("Recipe must contain at least one ingredient");
    }
    for p in percentages {
        if *p <= Decimal::ZERO {
            return Err("Recipe percentages must be greater than zero");
        }
    }
    let total: Decimal = percentages.iter().sum();
    if total != Decimal::from(100) {
        return Err("Recipe percentages must sum to 100%");
    }
    Ok(())
}

/// Validate an ingredient appears at most once in a recipe
pub fn validate_unique_ingredients(ids: &[i32]) -> Result<(), &'static str> {
    let mut seen = HashSet::with_capacity(ids.len());
    if ids.iter().all(|id| seen.insert(*id)) {
        Ok(())
    } else {
        Err("An ingredient can appear only once in a recipe")
    }
}

/// Target weight of one ingredient in a lot of `lot_weight`
pub fn target_weight(lot_weight: Decimal, percentage: Decimal) -> Decimal {
    (lot_weight * percentage / Decimal::from(100)).round_dp(3)
}

// ============================================================================
// Weighing Validations
// ============================================================================

/// Validate a tare/weight reading from a scale
pub fn validate_reading(value: Decimal) -> Result<(), &'static str> {
    if value < Decimal::ZERO {
        return Err("Scale readings cannot be negative");
    }
    Ok(())
}

/// Validate the weight requested per lot when scheduling
pub fn validate_lot_weight(weight: Decimal) -> Result<(), &'static str> {
    if weight <= Decimal::ZERO {
        return Err("Weight per lot must be greater than zero");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Trim and collapse inner whitespace of a master-data name
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compare names the way the database's case-insensitive collation does
pub fn names_match(a: &str, b: &str) -> bool {
    normalize_name(a).to_lowercase() == normalize_name(b).to_lowercase()
}

/// Case-insensitive substring match used by the name filters
pub fn name_contains(name: &str, needle: &str) -> bool {
    name.to_lowercase().contains(&needle.trim().to_lowercase())
}

/// Parse a scheduled date: `YYYY-MM-DD`, or an ISO date-time whose date part is used
pub fn parse_scheduled_date(raw: &str) -> Result<NaiveDate, &'static str> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt.date());
    }
    Err("FechaProgramada must be a date in YYYY-MM-DD format")
}

/// Empty or whitespace-only optional text becomes `None`
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Id sent in a query string. A blank value means no value.
pub fn parse_optional_id(raw: Option<&str>) -> Result<Option<i32>, &'static str> {
    match non_blank(raw) {
        Some(raw) => raw.parse().map(Some).map_err(|_| "must be an integer id"),
        None => Ok(None),
    }
}
