use super::ModelId;

use std::fmt;

/// A synthesized join table backing one many-to-many relation pair.
///
/// Exactly one descriptor exists per unordered pair of relation fields,
/// regardless of which side was declared or resolved first; sides are
/// ordered by (table name, field name) so synthesis is order-independent.
#[derive(Debug, Clone)]
pub struct JoinTable {
    pub id: JoinTableId,

    /// Synthesized table name
    pub name: String,

    pub lhs: JoinTableSide,
    pub rhs: JoinTableSide,
}

/// One side of a join table: the model it references and the foreign-key
/// column holding that side's primary key. Columns are named after each
/// side's table, suffixed `_a`/`_b` when both sides share a table.
#[derive(Debug, Clone)]
pub struct JoinTableSide {
    pub model: ModelId,
    pub column: String,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct JoinTableId(pub usize);

impl fmt::Debug for JoinTableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "JoinTableId({})", self.0)
    }
}
