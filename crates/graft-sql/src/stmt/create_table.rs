use graft_core::schema::db::TableId;

/// Create one table from the physical schema. The serializer reads the
/// table definition from the schema it was constructed with.
#[derive(Debug, Clone)]
pub struct CreateTable {
    pub table: TableId,
}
