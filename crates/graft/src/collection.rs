use crate::{Db, Direction, Model, Result};

use graft_core::schema::app::ModelId;
use graft_core::stmt::Value;

use std::marker::PhantomData;

/// Typed CRUD handle for one registered model.
pub struct Collection<'a, M: Model> {
    pub(crate) db: &'a Db,
    pub(crate) model: ModelId,
    pub(crate) _marker: PhantomData<M>,
}

/// Options for [`Collection::find_many`]: a conjunction of root-column
/// equality predicates, ordering over root columns, pagination, and fetch
/// depth.
#[derive(Debug, Clone, Default)]
pub struct FindMany {
    pub(crate) filter: Vec<(String, Value)>,
    pub(crate) order_by: Vec<(String, Direction)>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
    pub(crate) depth: u32,
}

/// One page of results, echoing the pagination that produced it.
#[derive(Debug)]
pub struct Page<M> {
    pub offset: u64,
    pub limit: Option<u64>,
    pub items: Vec<M>,
}

impl FindMany {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `column = value` on the root table.
    pub fn where_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter.push((column.into(), value.into()));
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order_by.push((column.into(), direction));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// How many levels of relations to populate.
    pub fn depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }
}

impl<M: Model> Collection<'_, M> {
    /// Get one record by primary key. Returns `Ok(None)` when no row has
    /// the key.
    pub async fn find_one(&self, key: impl Into<Value>, depth: u32) -> Result<Option<M>> {
        let row = self
            .db
            .engine
            .find_one(self.model, key.into(), depth)
            .await?;
        row.map(M::load).transpose()
    }

    /// Get many records.
    pub async fn find_many(&self, query: FindMany) -> Result<Page<M>> {
        let offset = query.offset.unwrap_or(0);
        let limit = query.limit;
        let rows = self.db.engine.find_many(self.model, &query).await?;
        Ok(Page {
            offset,
            limit,
            items: rows.into_iter().map(M::load).collect::<Result<_>>()?,
        })
    }

    /// Insert a record, upserting any full to-one records it holds first.
    pub async fn insert(&self, instance: &M) -> Result<()> {
        self.db.engine.insert(self.model, instance.to_row()).await
    }

    /// Update a record by primary key.
    pub async fn update(&self, instance: &M) -> Result<()> {
        self.db.engine.update(self.model, instance.to_row()).await
    }

    /// Insert the record if its key is absent, else update it.
    pub async fn upsert(&self, instance: &M) -> Result<()> {
        self.db.engine.upsert(self.model, instance.to_row()).await
    }

    /// Delete a record by primary key. Deleting an absent key is a no-op
    /// success; related rows and join-table rows are never cascaded.
    pub async fn delete(&self, key: impl Into<Value>) -> Result<()> {
        self.db.engine.delete(self.model, key.into()).await
    }
}
