use rusqlite::{types::Value as SqlValue, Row};

use graft_core::{stmt::Value, Error, Result};

/// Converts a SQLite cell to a raw engine scalar.
///
/// SQLite only distinguishes integer, real, text, blob, and null; decoding
/// into declared field types (uuid, json, bool) happens in the result
/// materializer, which knows the owning field.
pub(crate) fn from_sql(row: &Row<'_>, index: usize) -> Result<Value> {
    let value: SqlValue = row
        .get(index)
        .map_err(Error::driver_operation_failed)?;

    Ok(match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(value) => Value::I64(value),
        SqlValue::Real(value) => Value::F64(value),
        SqlValue::Text(value) => Value::String(value),
        SqlValue::Blob(_) => {
            return Err(Error::invalid_result(format!(
                "unexpected blob cell at column {index}"
            )));
        }
    })
}
