use super::super::{FieldId, FieldTy, JoinTable, JoinTableId, Model, ModelId, Schema};

#[derive(Debug, Clone)]
pub struct ManyToMany {
    /// Associated model
    pub target: ModelId,

    /// The collection field on the target that pairs with this. For a
    /// self-referential relation back-referencing its own field, this is
    /// the field itself.
    pub pair: FieldId,

    /// The synthesized join table shared by both directions
    pub join_table: JoinTableId,

    /// True when this relation owns the join table's left-hand column;
    /// the paired direction owns the right-hand one.
    pub owns_lhs: bool,
}

impl ManyToMany {
    pub fn target<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.target)
    }

    pub fn join_table<'a>(&self, schema: &'a Schema) -> &'a JoinTable {
        schema.join_table(self.join_table)
    }

    /// The join-table column holding this side's key.
    pub fn owning_column<'a>(&self, schema: &'a Schema) -> &'a str {
        let join_table = self.join_table(schema);
        if self.owns_lhs {
            &join_table.lhs.column
        } else {
            &join_table.rhs.column
        }
    }

    /// The join-table column holding the partner side's key.
    pub fn partner_column<'a>(&self, schema: &'a Schema) -> &'a str {
        let join_table = self.join_table(schema);
        if self.owns_lhs {
            &join_table.rhs.column
        } else {
            &join_table.lhs.column
        }
    }
}

impl From<ManyToMany> for FieldTy {
    fn from(value: ManyToMany) -> Self {
        Self::ManyToMany(value)
    }
}
