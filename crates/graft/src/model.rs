use crate::Result;

use graft_core::schema::app::ModelDecl;
use graft_core::stmt::ValueRecord;

/// A record type usable as a typed handle for table CRUD.
///
/// Implementations supply their declaration once and convert between
/// instances and rows of field values in declaration order. Relation fields
/// encode as:
///
/// - to-one: a nested [`Record`](graft_core::stmt::Value::Record) to
///   upsert-and-link, a bare key value to link only, or `Null`;
/// - to-many: a [`List`](graft_core::stmt::Value::List) of nested records
///   (and, for many-to-many, bare keys), decoded back as a list of records
///   populated to the fetch depth.
pub trait Model: Sized + Send + 'static {
    /// Logical model name; must match the declaration returned by
    /// [`Model::schema`].
    const NAME: &'static str;

    /// The model declaration handed to the schema builder during
    /// [`Db::builder`](crate::Db::builder) registration.
    fn schema() -> ModelDecl;

    /// Encode the instance's fields, in declaration order.
    fn to_row(&self) -> ValueRecord;

    /// Decode an instance from a materialized row, fields in declaration
    /// order.
    fn load(row: ValueRecord) -> Result<Self>;
}
