use graft_core::schema::db::TableId;

/// Create one secondary index declared on a table in the physical schema.
#[derive(Debug, Clone)]
pub struct CreateIndex {
    pub table: TableId,

    /// Index into the table's `indices`
    pub index: usize,
}
