use super::{Field, FieldId, JoinTable, JoinTableId, Model, ModelId};

use indexmap::IndexMap;

/// The application-level half of the table map: every resolved model plus
/// the synthesized join tables, indexed by id, model name, and table name.
#[derive(Debug)]
pub struct Schema {
    /// Models in registration order; `ModelId` indexes into this arena.
    pub models: Vec<Model>,

    /// Join tables in synthesis order; `JoinTableId` indexes into this.
    pub join_tables: Vec<JoinTable>,

    by_name: IndexMap<String, ModelId>,
    by_table: IndexMap<String, ModelId>,
}

impl Schema {
    pub(crate) fn new(models: Vec<Model>, join_tables: Vec<JoinTable>) -> Self {
        let by_name = models
            .iter()
            .map(|model| (model.name.clone(), model.id))
            .collect();
        let by_table = models
            .iter()
            .map(|model| (model.table_name.clone(), model.id))
            .collect();
        Self {
            models,
            join_tables,
            by_name,
            by_table,
        }
    }

    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        &self.models[id.into().0]
    }

    pub fn model_by_name(&self, name: &str) -> Option<&Model> {
        self.by_name.get(name).map(|id| self.model(*id))
    }

    pub fn model_by_table(&self, table_name: &str) -> Option<&Model> {
        self.by_table.get(table_name).map(|id| self.model(*id))
    }

    pub fn field(&self, id: FieldId) -> &Field {
        self.model(id.model).field(id)
    }

    pub fn join_table(&self, id: JoinTableId) -> &JoinTable {
        &self.join_tables[id.0]
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.iter()
    }
}
