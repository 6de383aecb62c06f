use graft_core::{Error, Result};

use std::fmt;

/// The result-column label that carries a join-tree position across the
/// wire: `{path}//{depth}//{column}`, with path segments joined by `/`.
///
/// The first path segment is the root table name; each further segment is
/// the to-one field followed at that step, so the path doubles as the SQL
/// alias of the joined table occurrence (distinct aliases for self-joins
/// come for free). `depth` is the join depth remaining at the owning table
/// when the column was selected: a foreign-key column at depth 0 had no
/// deeper join issued for it.
///
/// Schema identifiers cannot contain `/`, so encoding is injective and
/// decoding is plain string parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnAlias {
    pub path: Vec<String>,
    pub depth: u32,
    pub column: String,
}

impl ColumnAlias {
    /// Alias for a root-table column.
    pub fn root(table: impl Into<String>, depth: u32, column: impl Into<String>) -> Self {
        Self {
            path: vec![table.into()],
            depth,
            column: column.into(),
        }
    }

    /// Alias for a column one to-one step further down the join tree.
    pub fn child(&self, field: impl Into<String>, depth: u32, column: impl Into<String>) -> Self {
        let mut path = self.path.clone();
        path.push(field.into());
        Self {
            path,
            depth,
            column: column.into(),
        }
    }

    /// The SQL alias of the table occurrence this column belongs to.
    pub fn table_alias(&self) -> String {
        self.path.join("/")
    }

    /// Parse an encoded alias back into (path, depth, column).
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.split("//");
        let (Some(path), Some(depth), Some(column), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed(s));
        };

        if path.is_empty() || column.is_empty() || column.contains('/') {
            return Err(malformed(s));
        }
        let depth: u32 = depth.parse().map_err(|_| malformed(s))?;
        let path: Vec<String> = path.split('/').map(str::to_string).collect();
        if path.iter().any(String::is_empty) {
            return Err(malformed(s));
        }

        Ok(Self {
            path,
            depth,
            column: column.to_string(),
        })
    }
}

impl fmt::Display for ColumnAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}//{}//{}", self.path.join("/"), self.depth, self.column)
    }
}

fn malformed(s: &str) -> Error {
    Error::invalid_result(format!("malformed column alias `{s}`"))
}
