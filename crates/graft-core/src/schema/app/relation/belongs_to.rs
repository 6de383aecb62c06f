use super::super::{FieldId, FieldTy, Model, ModelId, Schema};
use crate::stmt;

#[derive(Debug, Clone)]
pub struct BelongsTo {
    /// Model the relation points at
    pub target: ModelId,

    /// Storage type of the foreign-key column; always the target's
    /// primary-key type.
    pub key_ty: stmt::Type,

    /// The `HasMany` or `ManyToMany` field on the target that pairs with
    /// this, when one is declared.
    pub pair: Option<FieldId>,
}

impl BelongsTo {
    pub fn target<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.target)
    }
}

impl From<BelongsTo> for FieldTy {
    fn from(value: BelongsTo) -> Self {
        Self::BelongsTo(value)
    }
}
