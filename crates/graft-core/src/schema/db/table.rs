use super::{Column, ColumnId, Index};

use std::fmt;

/// A database table
#[derive(Debug)]
pub struct Table {
    /// Uniquely identifies the table within the schema
    pub id: TableId,

    /// Name of the table
    pub name: String,

    /// The table's columns
    pub columns: Vec<Column>,

    /// The primary-key column. Join tables have none; their identity is the
    /// uniqueness constraint over the pair.
    pub primary_key: Option<ColumnId>,

    /// Multi-column uniqueness constraints
    pub unique_constraints: Vec<UniqueConstraint>,

    /// Secondary indices, created as separate statements
    pub indices: Vec<Index>,
}

/// Uniquely identifies a table
#[derive(PartialEq, Eq, Clone, Copy, Hash)]
pub struct TableId(pub usize);

/// A uniqueness constraint spanning one or more columns, identified by
/// column index within the owning table.
#[derive(Debug, Clone)]
pub struct UniqueConstraint {
    pub columns: Vec<usize>,
}

impl Table {
    pub(crate) fn new(id: TableId, name: String) -> Self {
        Self {
            id,
            name,
            columns: vec![],
            primary_key: None,
            unique_constraints: vec![],
            indices: vec![],
        }
    }

    pub fn column(&self, id: impl Into<ColumnId>) -> &Column {
        &self.columns[id.into().index]
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn primary_key_column(&self) -> Option<&Column> {
        self.primary_key.map(|id| &self.columns[id.index])
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TableId({})", self.0)
    }
}
