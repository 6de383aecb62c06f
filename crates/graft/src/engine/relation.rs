use super::{compose, exec::UnitOfWork, materialize, Engine};
use crate::Result;

use async_recursion::async_recursion;

use graft_core::schema::app::{FieldTy, Model};
use graft_core::stmt::{Value, ValueRecord};
use graft_sql::stmt::{ColumnRef, Expr, Select, SelectColumn, TableRef};

impl Engine {
    /// Populate a materialized record's to-many relations, recursively,
    /// then recurse into any nested to-one records the join tree already
    /// produced. Termination is strict: every step decrements `depth`, so
    /// cyclic relation graphs stop at the requested depth.
    ///
    /// To-many relations take two bounded queries — related keys first,
    /// then a composed fetch restricted to that key set — because joining a
    /// to-many relation into the primary statement would duplicate root
    /// rows ambiguously.
    #[async_recursion]
    pub(super) async fn populate(
        &self,
        uow: &UnitOfWork<'_>,
        model: &Model,
        record: &mut ValueRecord,
        depth: u32,
    ) -> Result<()> {
        if depth == 0 {
            // Exhausted: to-many fields stay empty collections, to-one
            // fields stay bare keys.
            return Ok(());
        }

        let key = record[model.primary_key.index].clone();

        for field in model.to_many_fields() {
            let (target, keys) = match &field.ty {
                FieldTy::HasMany(has_many) => {
                    let pair = self.schema.field(has_many.pair);
                    let target = has_many.target(&self.schema.app);
                    let keys = self
                        .related_keys(
                            uow,
                            &target.table_name,
                            &target.primary_key_field().name,
                            &pair.name,
                            key.clone(),
                        )
                        .await?;
                    (target, keys)
                }
                FieldTy::ManyToMany(many_to_many) => {
                    let target = many_to_many.target(&self.schema.app);
                    let join_table = many_to_many.join_table(&self.schema.app);
                    let keys = self
                        .related_keys(
                            uow,
                            &join_table.name,
                            many_to_many.partner_column(&self.schema.app),
                            many_to_many.owning_column(&self.schema.app),
                            key.clone(),
                        )
                        .await?;
                    (target, keys)
                }
                FieldTy::Primitive(_) | FieldTy::BelongsTo(_) => unreachable!(),
            };

            let mut items = vec![];
            if !keys.is_empty() {
                let mut fetched = self.find_by_keys(uow, target, keys, depth - 1).await?;
                for item in &mut fetched {
                    self.populate(uow, target, item, depth - 1).await?;
                }
                items = fetched.into_iter().map(Value::Record).collect();
            }
            record.fields[field.id.index] = Value::List(items);
        }

        for field in model.belongs_to_fields() {
            if let Value::Record(nested) = &mut record.fields[field.id.index] {
                let target = self.schema.model(field.ty.expect_belongs_to().target);
                self.populate(uow, target, nested, depth - 1).await?;
            }
        }

        Ok(())
    }

    /// Step one of a to-many fetch: the related primary keys, read off the
    /// foreign table's back-reference column or the join table.
    async fn related_keys(
        &self,
        uow: &UnitOfWork<'_>,
        table: &str,
        select_column: &str,
        filter_column: &str,
        key: Value,
    ) -> Result<Vec<Value>> {
        let mut select = Select::new(TableRef::new(table, table));
        select.columns.push(SelectColumn {
            table: table.to_string(),
            column: select_column.to_string(),
            alias: format!("{table}//0//{select_column}"),
        });
        select.filter = Some(Expr::Eq(ColumnRef::new(table, filter_column), key));

        let rows = self.query(uow, &select.into()).await?;
        Ok(rows
            .rows
            .into_iter()
            .filter_map(|mut cells| {
                let cell = cells.pop()?;
                (!cell.is_null()).then_some(cell)
            })
            .collect())
    }

    /// Step two: fetch the full records for a key set, at the remaining
    /// depth.
    async fn find_by_keys(
        &self,
        uow: &UnitOfWork<'_>,
        model: &Model,
        keys: Vec<Value>,
        depth: u32,
    ) -> Result<Vec<ValueRecord>> {
        let (mut select, _) = compose::compose(&self.schema, model, depth);
        select.filter = Some(Expr::InList(
            ColumnRef::new(
                model.table_name.as_str(),
                model.primary_key_field().name.as_str(),
            ),
            keys,
        ));

        let rows = self.query(uow, &select.into()).await?;
        materialize::materialize(&self.schema, model, rows, true)
    }
}
