use crate::Schema;

use graft_core::driver::RowSet;
use graft_core::schema::app::{FieldTy, Model};
use graft_core::stmt::{Type, Value, ValueRecord};
use graft_core::{Error, Result};
use graft_sql::ColumnAlias;

use indexmap::IndexMap;

/// Rebuild nested records from the flat row set of a composed SELECT.
///
/// Every result column label is a parseable [`ColumnAlias`]; cells are
/// matched back to their owning table occurrence purely by alias, then
/// decoded into the owning field's declared type. A to-one field becomes a
/// nested record when its joined branch produced a row (branch primary key
/// non-null), and stays the bare foreign-key value otherwise — whether the
/// branch was beyond the fetch depth or the left join found nothing.
/// To-many fields always come back as empty lists here; the relation
/// fetcher fills them.
///
/// For array results, rows fold into an order-preserving map keyed by the
/// root primary key, so result order is first-seen row order.
pub(super) fn materialize(
    schema: &Schema,
    model: &Model,
    row_set: RowSet,
    is_array: bool,
) -> Result<Vec<ValueRecord>> {
    let aliases: Vec<ColumnAlias> = row_set
        .columns
        .iter()
        .map(|column| ColumnAlias::parse(column))
        .collect::<Result<_>>()?;

    let mut out: IndexMap<String, ValueRecord> = IndexMap::new();

    for cells in row_set.rows {
        if cells.len() != aliases.len() {
            return Err(Error::invalid_result(format!(
                "row width {} does not match {} aliased columns",
                cells.len(),
                aliases.len()
            )));
        }

        let Some(record) = decode_node(schema, model, &aliases, &cells, &model.table_name)?
        else {
            continue;
        };

        // Key by the root primary key; to-one joins produce at most one row
        // per root row, so folding only deduplicates defensively.
        let key = format!("{:?}", record[model.primary_key.index]);
        out.entry(key).or_insert(record);

        if !is_array && !out.is_empty() {
            break;
        }
    }

    Ok(out.into_values().collect())
}

/// Decode the table occurrence at `path` into a record, or `None` when the
/// row carries no live data for it (no columns were selected under the
/// path, or its primary key is null because the left join found no row).
fn decode_node(
    schema: &Schema,
    model: &Model,
    aliases: &[ColumnAlias],
    cells: &[Value],
    path: &str,
) -> Result<Option<ValueRecord>> {
    let mut node: IndexMap<&str, &Value> = IndexMap::new();
    for (alias, cell) in aliases.iter().zip(cells) {
        if alias.table_alias() == path {
            node.insert(alias.column.as_str(), cell);
        }
    }
    if node.is_empty() {
        return Ok(None);
    }

    let pk_name = model.primary_key_field().name.as_str();
    let pk_cell = *node.get(pk_name).ok_or_else(|| {
        Error::invalid_result(format!("missing primary key column `{pk_name}` at `{path}`"))
    })?;
    if pk_cell.is_null() {
        return Ok(None);
    }

    let mut fields = Vec::with_capacity(model.fields.len());
    for field in &model.fields {
        let cell = |name: &str| {
            node.get(name).copied().ok_or_else(|| {
                Error::invalid_result(format!("missing column `{name}` at `{path}`"))
            })
        };

        let value = match &field.ty {
            FieldTy::Primitive(primitive) => decode_scalar(cell(&field.name)?, &primitive.ty)?,
            FieldTy::BelongsTo(belongs_to) => {
                let target = schema.model(belongs_to.target);
                let child_path = format!("{path}/{}", field.name);
                match decode_node(schema, target, aliases, cells, &child_path)? {
                    Some(nested) => Value::Record(nested),
                    // No joined row: the field keeps the raw foreign key.
                    None => decode_scalar(cell(&field.name)?, &belongs_to.key_ty)?,
                }
            }
            FieldTy::HasMany(_) | FieldTy::ManyToMany(_) => Value::List(vec![]),
        };
        fields.push(value);
    }

    Ok(Some(ValueRecord::from_vec(fields)))
}

/// Decode a raw engine scalar into a declared field type. Engines report
/// the storage shape (SQLite: integer/real/text), not the declared one.
pub(super) fn decode_scalar(raw: &Value, ty: &Type) -> Result<Value> {
    Ok(match (ty, raw) {
        (_, Value::Null) => Value::Null,
        (Type::Bool, Value::Bool(v)) => Value::Bool(*v),
        (Type::Bool, Value::I64(v)) => Value::Bool(*v != 0),
        (Type::I64, Value::I64(v)) => Value::I64(*v),
        (Type::F64, Value::F64(v)) => Value::F64(*v),
        (Type::F64, Value::I64(v)) => Value::F64(*v as f64),
        (Type::Text { .. }, Value::String(v)) => Value::String(v.clone()),
        (Type::Uuid, Value::Uuid(v)) => Value::Uuid(*v),
        (Type::Uuid, Value::String(v)) => Value::Uuid(v.parse()?),
        (Type::Json, Value::Json(v)) => Value::Json(v.clone()),
        (Type::Json, Value::String(v)) => Value::Json(serde_json::from_str(v)?),
        _ => {
            return Err(Error::invalid_result(format!(
                "cannot decode {raw:?} as {ty:?}"
            )));
        }
    })
}
