//! Column readers for tiberius rows

use rust_decimal::Decimal;
use tiberius::{numeric::Numeric, FromSql, Row};

use crate::error::{AppError, AppResult};

/// Nullable column
pub(super) fn get<'a, T>(row: &'a Row, column: &str) -> AppResult<Option<T>>
where
    T: FromSql<'a>,
{
    Ok(row.try_get::<T, _>(column)?)
}

/// Column declared `NOT NULL`
pub(super) fn require<'a, T>(row: &'a Row, column: &str) -> AppResult<T>
where
    T: FromSql<'a>,
{
    get(row, column)?.ok_or_else(|| AppError::Internal(format!("Column {} is NULL", column)))
}

pub(super) fn text(row: &Row, column: &str) -> AppResult<Option<String>> {
    Ok(row.try_get::<&str, _>(column)?.map(str::to_string))
}

pub(super) fn require_text(row: &Row, column: &str) -> AppResult<String> {
    text(row, column)?.ok_or_else(|| AppError::Internal(format!("Column {} is NULL", column)))
}

/// `DECIMAL` parameter. Queries bind [`Numeric`], which carries the same
/// mantissa and scale as the `Decimal`.
pub(super) fn numeric(value: Decimal) -> Numeric {
    Numeric::new_with_scale(value.mantissa(), value.scale() as u8)
}
