use graft_core::stmt::Value;

/// A column occurrence, qualified by the table name or alias it belongs to.
#[derive(Debug, Clone)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// The predicate surface the composer needs: conjunctions of equalities
/// plus the key-set restriction used by the relation fetcher.
#[derive(Debug, Clone)]
pub enum Expr {
    And(Vec<Expr>),
    Eq(ColumnRef, Value),
    InList(ColumnRef, Vec<Value>),
}

impl Expr {
    pub fn eq(column: ColumnRef, value: impl Into<Value>) -> Self {
        Self::Eq(column, value.into())
    }

    pub fn in_list(column: ColumnRef, values: Vec<Value>) -> Self {
        Self::InList(column, values)
    }

    /// Conjunction; a single operand collapses to itself.
    pub fn and_from_vec(mut operands: Vec<Expr>) -> Self {
        if operands.len() == 1 {
            operands.remove(0)
        } else {
            Self::And(operands)
        }
    }
}
