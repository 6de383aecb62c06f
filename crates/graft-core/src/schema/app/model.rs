use super::{Field, FieldId, FieldTy, Index};
use crate::stmt;

use std::fmt;

/// A resolved record type descriptor. Immutable once the containing schema
/// is built.
#[derive(Debug, Clone)]
pub struct Model {
    /// Uniquely identifies the model within the schema
    pub id: ModelId,

    /// Logical model name
    pub name: String,

    /// Name of the table the model maps to
    pub table_name: String,

    /// Fields contained by the model, in declaration order
    pub fields: Vec<Field>,

    /// The primary-key field
    pub primary_key: FieldId,

    /// Secondary indices and uniqueness constraints
    pub indices: Vec<Index>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ModelId(pub usize);

impl Model {
    pub fn field(&self, field: impl Into<FieldId>) -> &Field {
        let field_id = field.into();
        assert_eq!(self.id, field_id.model);
        &self.fields[field_id.index]
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn primary_key_field(&self) -> &Field {
        &self.fields[self.primary_key.index]
    }

    /// The primary key's scalar type; foreign keys referencing this model
    /// store a value of this type.
    pub fn key_ty(&self) -> &stmt::Type {
        &self.primary_key_field().ty.expect_primitive().ty
    }

    /// Iterate the fields that map to physical columns (primitives and
    /// to-one foreign keys), in declaration order. Column order in the
    /// lowered table matches this iterator.
    pub fn column_fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter().filter(|field| field.is_column())
    }

    /// Iterate the to-many relation fields, which the relation fetcher
    /// populates with secondary queries.
    pub fn to_many_fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter().filter(|field| field.is_to_many())
    }

    pub fn belongs_to_fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields
            .iter()
            .filter(|field| matches!(field.ty, FieldTy::BelongsTo(_)))
    }
}

impl ModelId {
    /// Create a `FieldId` representing the current model's field at index
    /// `index`.
    pub const fn field(self, index: usize) -> FieldId {
        FieldId { model: self, index }
    }
}

impl From<&Self> for ModelId {
    fn from(src: &Self) -> Self {
        *src
    }
}

impl From<&Model> for ModelId {
    fn from(value: &Model) -> Self {
        value.id
    }
}

impl fmt::Debug for ModelId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ModelId({})", self.0)
    }
}
