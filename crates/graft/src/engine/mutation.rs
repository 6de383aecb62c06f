use crate::Schema;

use graft_core::driver::Capability;
use graft_core::schema::app::{FieldTy, Model, ModelId};
use graft_core::stmt::{Value, ValueRecord};
use graft_core::{Error, Result};
use graft_sql::stmt::{ColumnRef, Expr, Insert, OnConflict, Statement, Update};

/// Statement plans for single-record mutations.
///
/// Every plan runs the same relation pre-pass: a to-one field holding a
/// full record upserts that record first, depth-first, so its primary key
/// exists before the owning row is written, and the field is reduced to the
/// foreign key for the owning statement. Insert and upsert additionally run
/// a post-pass over to-many fields: full records are upserted after the
/// owning row, and many-to-many pairs get their join row.
pub(super) fn insert_plan(
    schema: &Schema,
    capability: &Capability,
    model: ModelId,
    row: &ValueRecord,
) -> Result<Vec<Statement>> {
    plan(schema, capability, model, row, WriteKind::Insert)
}

pub(super) fn update_plan(
    schema: &Schema,
    capability: &Capability,
    model: ModelId,
    row: &ValueRecord,
) -> Result<Vec<Statement>> {
    plan(schema, capability, model, row, WriteKind::Update)
}

pub(super) fn upsert_plan(
    schema: &Schema,
    capability: &Capability,
    model: ModelId,
    row: &ValueRecord,
) -> Result<Vec<Statement>> {
    plan(schema, capability, model, row, WriteKind::Upsert)
}

#[derive(Clone, Copy, PartialEq)]
enum WriteKind {
    Insert,
    Update,
    Upsert,
}

fn plan(
    schema: &Schema,
    capability: &Capability,
    model: ModelId,
    row: &ValueRecord,
    kind: WriteKind,
) -> Result<Vec<Statement>> {
    let mut statements = vec![];
    let mut seen = vec![];
    push_write(
        schema,
        capability,
        model,
        row,
        kind,
        &mut statements,
        &mut seen,
    )?;
    Ok(statements)
}

fn push_write(
    schema: &Schema,
    capability: &Capability,
    model_id: ModelId,
    row: &ValueRecord,
    kind: WriteKind,
    statements: &mut Vec<Statement>,
    seen: &mut Vec<(ModelId, Value)>,
) -> Result<()> {
    let model = schema.model(model_id);
    if row.len() != model.fields.len() {
        return Err(Error::invalid_result(format!(
            "row has {} fields, model `{}` declares {}",
            row.len(),
            model.name,
            model.fields.len()
        )));
    }

    let key = primary_key_of(model, row)?;

    // A record already planned in this pass is not planned again; cyclic
    // instance graphs reduce to their keys.
    if seen.contains(&(model_id, key.clone())) {
        return Ok(());
    }
    seen.push((model_id, key.clone()));

    // Relation pre-pass, then the owning row's column values.
    let mut columns = vec![];
    let mut values = vec![];
    for field in &model.fields {
        let value = &row[field.id.index];
        match &field.ty {
            FieldTy::Primitive(primitive) => {
                if !primitive.ty.matches(value) {
                    return Err(Error::invalid_result(format!(
                        "value {value:?} does not fit `{}.{}`",
                        model.name, field.name
                    )));
                }
                columns.push(field.name.clone());
                values.push(value.clone());
            }
            FieldTy::BelongsTo(belongs_to) => {
                let reduced = match value {
                    Value::Record(nested) => {
                        push_write(
                            schema,
                            capability,
                            belongs_to.target,
                            nested,
                            WriteKind::Upsert,
                            statements,
                            seen,
                        )?;
                        primary_key_of(belongs_to.target(&schema.app), nested)?
                    }
                    other => other.clone(),
                };
                columns.push(field.name.clone());
                values.push(reduced);
            }
            FieldTy::HasMany(_) | FieldTy::ManyToMany(_) => {}
        }
    }

    let pk_name = model.primary_key_field().name.clone();
    let non_pk: Vec<String> = columns
        .iter()
        .filter(|name| **name != pk_name)
        .cloned()
        .collect();

    match kind {
        WriteKind::Insert => statements.push(
            Insert {
                table: model.table_name.clone(),
                columns,
                values,
                on_conflict: None,
            }
            .into(),
        ),
        WriteKind::Upsert => {
            let on_conflict = if non_pk.is_empty() {
                OnConflict::DoNothing {
                    target: vec![pk_name],
                }
            } else {
                OnConflict::DoUpdate {
                    target: vec![pk_name],
                    update: non_pk,
                }
            };
            statements.push(
                Insert {
                    table: model.table_name.clone(),
                    columns,
                    values,
                    on_conflict: Some(on_conflict),
                }
                .into(),
            );
        }
        WriteKind::Update => {
            let assignments: Vec<(String, Value)> = columns
                .into_iter()
                .zip(values)
                .filter(|(name, _)| *name != pk_name)
                .collect();
            if !assignments.is_empty() {
                statements.push(
                    Update {
                        table: model.table_name.clone(),
                        assignments,
                        filter: Expr::Eq(
                            ColumnRef::new(model.table_name.as_str(), pk_name.as_str()),
                            key.clone(),
                        ),
                    }
                    .into(),
                );
            }
        }
    }

    // To-many post-pass: children after the owning row so foreign keys and
    // join rows land on existing rows. Updates touch the owning row only.
    if kind == WriteKind::Update {
        return Ok(());
    }

    for field in model.to_many_fields() {
        let items = match &row[field.id.index] {
            Value::List(items) => items,
            Value::Null => continue,
            other => {
                return Err(Error::invalid_result(format!(
                    "to-many field `{}.{}` holds {other:?}, expected a list",
                    model.name, field.name
                )));
            }
        };

        match &field.ty {
            FieldTy::HasMany(has_many) => {
                // The child row carries the foreign key; only full records
                // can be written through this side.
                for item in items {
                    if let Value::Record(nested) = item {
                        push_write(
                            schema,
                            capability,
                            has_many.target,
                            nested,
                            WriteKind::Upsert,
                            statements,
                            seen,
                        )?;
                    }
                }
            }
            FieldTy::ManyToMany(many_to_many) => {
                for item in items {
                    let partner_key = match item {
                        Value::Record(nested) => {
                            push_write(
                                schema,
                                capability,
                                many_to_many.target,
                                nested,
                                WriteKind::Upsert,
                                statements,
                                seen,
                            )?;
                            primary_key_of(many_to_many.target(&schema.app), nested)?
                        }
                        other => other.clone(),
                    };

                    let owning = many_to_many.owning_column(&schema.app).to_string();
                    let partner = many_to_many.partner_column(&schema.app).to_string();
                    let join_table = many_to_many.join_table(&schema.app);
                    statements.push(
                        Insert {
                            table: join_table.name.clone(),
                            // Linking twice is a no-op under the pair
                            // uniqueness constraint.
                            on_conflict: capability.on_conflict.then(|| OnConflict::DoNothing {
                                target: vec![owning.clone(), partner.clone()],
                            }),
                            columns: vec![owning, partner],
                            values: vec![key.clone(), partner_key],
                        }
                        .into(),
                    );
                }
            }
            FieldTy::Primitive(_) | FieldTy::BelongsTo(_) => unreachable!(),
        }
    }

    Ok(())
}

/// The record's primary key value, which must be a present scalar.
pub(super) fn primary_key_of(model: &Model, row: &ValueRecord) -> Result<Value> {
    let value = &row[model.primary_key.index];
    match value {
        Value::Null | Value::Record(_) | Value::List(_) => Err(Error::invalid_result(format!(
            "record of `{}` has no usable primary key; value={value:?}",
            model.name
        ))),
        other => Ok(other.clone()),
    }
}

/// Structural equality between a to-be-written row and a found record,
/// compared over column fields with to-one fields reduced to their keys.
pub(super) fn columns_equal(
    schema: &Schema,
    model: &Model,
    row: &ValueRecord,
    found: &ValueRecord,
) -> Result<bool> {
    for field in model.column_fields() {
        let given = &row[field.id.index];
        let reduced = match (&field.ty, given) {
            (FieldTy::BelongsTo(belongs_to), Value::Record(nested)) => {
                primary_key_of(belongs_to.target(&schema.app), nested)?
            }
            _ => given.clone(),
        };
        if reduced != found[field.id.index] {
            return Ok(false);
        }
    }
    Ok(true)
}
