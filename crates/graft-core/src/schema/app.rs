mod decl;
pub use decl::{DeclTy, FieldDecl, ModelDecl};

mod field;
pub use field::{Field, FieldId, FieldPrimitive, FieldTy};

mod index;
pub use index::Index;

mod join_table;
pub use join_table::{JoinTable, JoinTableId, JoinTableSide};

mod model;
pub use model::{Model, ModelId};

mod relation;
pub use relation::{BelongsTo, HasMany, ManyToMany};

mod schema;
pub use schema::Schema;
