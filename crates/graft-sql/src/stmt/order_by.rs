use super::{ColumnRef, Direction};

#[derive(Debug, Clone)]
pub struct OrderBy {
    pub column: ColumnRef,
    pub direction: Direction,
}
