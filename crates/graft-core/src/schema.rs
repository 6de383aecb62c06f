pub mod app;

mod builder;
pub use builder::Builder;

pub mod db;

use app::{Field, FieldId, JoinTableId, Model, ModelId};
use db::{Table, TableId};

use std::sync::Arc;

/// The resolved table map: application-level model descriptors plus the
/// physical schema they lower to. Built once by [`Builder::build`], shared
/// read-only for the life of the process.
#[derive(Debug)]
pub struct Schema {
    /// Application-level schema
    pub app: app::Schema,

    /// Database-level schema
    pub db: Arc<db::Schema>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        self.app.model(id)
    }

    pub fn field(&self, id: FieldId) -> &Field {
        self.app.field(id)
    }

    /// The physical table a model lowers to.
    ///
    /// The builder emits one table per model, in model order, before any
    /// join tables, so the table arena index equals the model index.
    pub fn table_for(&self, id: impl Into<ModelId>) -> &Table {
        let id = id.into();
        let table = self.db.table(TableId(id.0));
        debug_assert_eq!(table.name, self.app.model(id).table_name);
        table
    }

    /// The physical table a many-to-many join-table descriptor lowers to.
    /// Join tables follow the model tables in the table arena.
    pub fn join_table_for(&self, id: JoinTableId) -> &Table {
        let table = self.db.table(TableId(self.app.models.len() + id.0));
        debug_assert_eq!(table.name, self.app.join_table(id).name);
        table
    }
}
