mod compose;
mod exec;
mod materialize;
mod mutation;
mod relation;

use crate::collection::FindMany;
use crate::{Result, Schema};
use exec::UnitOfWork;

use graft_core::driver::{Capability, Driver, Response, RowSet};
use graft_core::schema::app::ModelId;
use graft_core::stmt::{Value, ValueRecord};
use graft_sql::stmt::{ColumnRef, Delete, Expr, OrderBy, Statement};
use graft_sql::Serializer;

use std::sync::Arc;

/// Executes logical operations against the driver. Holds no mutable state;
/// every request is a forward pipeline of compose, execute, materialize,
/// and (optionally) relation fetches inside one unit of work.
pub(crate) struct Engine {
    pub(crate) schema: Arc<Schema>,
    pub(crate) driver: Arc<dyn Driver>,
}

impl Engine {
    pub(crate) fn new(schema: Arc<Schema>, driver: Arc<dyn Driver>) -> Self {
        Self { schema, driver }
    }

    fn capability(&self) -> &Capability {
        self.driver.capability()
    }

    /// Issue the create-schema statements: every table, then every
    /// secondary index.
    pub(crate) async fn create_tables(&self) -> Result<()> {
        let uow = UnitOfWork::begin(self).await?;
        let result = self.create_tables_in(&uow).await;
        uow.finish(result).await
    }

    async fn create_tables_in(&self, uow: &UnitOfWork<'_>) -> Result<()> {
        use graft_sql::stmt::{CreateIndex, CreateTable};

        for table in &self.schema.db.tables {
            uow.execute(&CreateTable { table: table.id }.into()).await?;
        }
        for table in &self.schema.db.tables {
            for index in 0..table.indices.len() {
                uow.execute(
                    &CreateIndex {
                        table: table.id,
                        index,
                    }
                    .into(),
                )
                .await?;
            }
        }
        Ok(())
    }

    pub(crate) async fn find_one(
        &self,
        model: ModelId,
        key: Value,
        depth: u32,
    ) -> Result<Option<ValueRecord>> {
        let uow = UnitOfWork::begin(self).await?;
        let result = self.find_one_in(&uow, model, key, depth).await;
        uow.finish(result).await
    }

    async fn find_one_in(
        &self,
        uow: &UnitOfWork<'_>,
        model_id: ModelId,
        key: Value,
        depth: u32,
    ) -> Result<Option<ValueRecord>> {
        let model = self.schema.model(model_id);
        let (mut select, _) = compose::compose(&self.schema, model, depth);
        select.filter = Some(Expr::Eq(
            ColumnRef::new(model.table_name.as_str(), model.primary_key_field().name.as_str()),
            key,
        ));

        let rows = self.query(uow, &select.into()).await?;
        let mut records = materialize::materialize(&self.schema, model, rows, false)?;

        let Some(mut record) = records.pop() else {
            return Ok(None);
        };
        self.populate(uow, model, &mut record, depth).await?;
        Ok(Some(record))
    }

    pub(crate) async fn find_many(
        &self,
        model: ModelId,
        query: &FindMany,
    ) -> Result<Vec<ValueRecord>> {
        let uow = UnitOfWork::begin(self).await?;
        let result = self.find_many_in(&uow, model, query).await;
        uow.finish(result).await
    }

    async fn find_many_in(
        &self,
        uow: &UnitOfWork<'_>,
        model_id: ModelId,
        query: &FindMany,
    ) -> Result<Vec<ValueRecord>> {
        let model = self.schema.model(model_id);
        let (mut select, _) = compose::compose(&self.schema, model, query.depth);

        let mut predicates = vec![];
        for (column, value) in &query.filter {
            self.root_column(model_id, column)?;
            predicates.push(Expr::Eq(
                ColumnRef::new(model.table_name.as_str(), column.as_str()),
                value.clone(),
            ));
        }
        if !predicates.is_empty() {
            select.filter = Some(Expr::and_from_vec(predicates));
        }
        for (column, direction) in &query.order_by {
            self.root_column(model_id, column)?;
            select.order_by.push(OrderBy {
                column: ColumnRef::new(model.table_name.as_str(), column.as_str()),
                direction: *direction,
            });
        }
        select.limit = query.limit;
        select.offset = query.offset;

        let rows = self.query(uow, &select.into()).await?;
        let mut records = materialize::materialize(&self.schema, model, rows, true)?;

        for record in &mut records {
            self.populate(uow, model, record, query.depth).await?;
        }
        Ok(records)
    }

    pub(crate) async fn insert(&self, model: ModelId, row: ValueRecord) -> Result<()> {
        let plan = mutation::insert_plan(&self.schema, self.capability(), model, &row)?;
        self.run_plan(plan).await
    }

    pub(crate) async fn update(&self, model: ModelId, row: ValueRecord) -> Result<()> {
        let plan = mutation::update_plan(&self.schema, self.capability(), model, &row)?;
        self.run_plan(plan).await
    }

    pub(crate) async fn upsert(&self, model: ModelId, row: ValueRecord) -> Result<()> {
        if self.capability().on_conflict {
            let plan = mutation::upsert_plan(&self.schema, self.capability(), model, &row)?;
            return self.run_plan(plan).await;
        }

        // Fallback for dialects without a native upsert: look the record up
        // by key, then no-op, update, or insert.
        let uow = UnitOfWork::begin(self).await?;
        let result = self.upsert_fallback_in(&uow, model, &row).await;
        uow.finish(result).await
    }

    async fn upsert_fallback_in(
        &self,
        uow: &UnitOfWork<'_>,
        model_id: ModelId,
        row: &ValueRecord,
    ) -> Result<()> {
        let model = self.schema.model(model_id);
        let key = mutation::primary_key_of(model, row)?;

        let plan = match self.find_one_in(uow, model_id, key, 0).await? {
            None => mutation::insert_plan(&self.schema, self.capability(), model_id, row)?,
            Some(found) => {
                if mutation::columns_equal(&self.schema, model, row, &found)? {
                    return Ok(());
                }
                mutation::update_plan(&self.schema, self.capability(), model_id, row)?
            }
        };
        for statement in &plan {
            uow.execute(statement).await?;
        }
        Ok(())
    }

    pub(crate) async fn delete(&self, model_id: ModelId, key: Value) -> Result<()> {
        let model = self.schema.model(model_id);
        let statement = Delete {
            table: model.table_name.clone(),
            filter: Expr::Eq(
                ColumnRef::new(model.table_name.as_str(), model.primary_key_field().name.as_str()),
                key,
            ),
        };
        // Deleting an absent key affects zero rows, which is success.
        self.run_plan(vec![statement.into()]).await
    }

    /// Execute a mutation plan inside one unit of work.
    async fn run_plan(&self, plan: Vec<Statement>) -> Result<()> {
        let uow = UnitOfWork::begin(self).await?;
        let result = async {
            for statement in &plan {
                uow.execute(statement).await?;
            }
            Ok(())
        }
        .await;
        uow.finish(result).await
    }

    /// Execute a statement expected to produce rows.
    async fn query(&self, uow: &UnitOfWork<'_>, statement: &Statement) -> Result<RowSet> {
        let response = uow.execute(statement).await?;
        response.rows.into_row_set().ok_or_else(|| {
            graft_core::Error::invalid_result("expected rows, got an affected-row count")
        })
    }

    async fn execute_statement(&self, statement: &Statement) -> Result<Response> {
        let sql = Serializer::new(&self.schema.db, self.capability().dialect).serialize(statement);
        trace_query!(&sql);
        self.driver.execute(&sql).await
    }

    async fn execute_raw(&self, sql: &str) -> Result<Response> {
        trace_query!(sql);
        self.driver.execute(sql).await
    }

    /// Validate that `column` names a physical column on the root model.
    fn root_column(&self, model_id: ModelId, column: &str) -> Result<()> {
        let model = self.schema.model(model_id);
        match model.field_by_name(column) {
            Some(field) if field.is_column() => Ok(()),
            _ => Err(anyhow::anyhow!(
                "`{}` is not a column of table `{}`",
                column,
                model.table_name
            )
            .into()),
        }
    }
}
