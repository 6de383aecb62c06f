use super::{ColumnRef, Expr, OrderBy};

/// One SELECT over a root table plus any number of left-joined to-one
/// branches, every output column explicitly aliased.
#[derive(Debug, Clone)]
pub struct Select {
    pub from: TableRef,
    pub columns: Vec<SelectColumn>,
    pub joins: Vec<Join>,
    pub filter: Option<Expr>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// A table occurrence under an explicit alias. The root is aliased to its
/// own name so every column reference is alias-qualified, which keeps
/// self-joins unambiguous.
#[derive(Debug, Clone)]
pub struct TableRef {
    pub name: String,
    pub alias: String,
}

impl TableRef {
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectColumn {
    /// Alias of the table occurrence the column is read from
    pub table: String,

    pub column: String,

    /// Output label; the composer uses the encoded column-alias form.
    pub alias: String,
}

/// `LEFT JOIN {table} ON {lhs} = {rhs}`
#[derive(Debug, Clone)]
pub struct Join {
    pub table: TableRef,
    pub lhs: ColumnRef,
    pub rhs: ColumnRef,
}

impl Select {
    pub fn new(from: TableRef) -> Self {
        Self {
            from,
            columns: vec![],
            joins: vec![],
            filter: None,
            order_by: vec![],
            limit: None,
            offset: None,
        }
    }
}
