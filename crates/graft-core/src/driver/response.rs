use crate::stmt::Value;

#[derive(Debug)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Operation result, as an ordered set of named rows
    Values(RowSet),
}

/// The engine's result shape: column names in statement order, then rows of
/// raw scalar cells in the same order. Cells carry the engine's native
/// scalars; decoding into declared field types happens downstream.
#[derive(Debug, Default)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn row_set(rows: RowSet) -> Self {
        Self {
            rows: Rows::Values(rows),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Self::Values(_))
    }

    #[track_caller]
    pub fn into_count(self) -> u64 {
        match self {
            Self::Count(count) => count,
            Self::Values(rows) => rows.rows.len() as u64,
        }
    }

    pub fn into_row_set(self) -> Option<RowSet> {
        match self {
            Self::Values(rows) => Some(rows),
            Self::Count(_) => None,
        }
    }
}

impl RowSet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
