use super::Error;

/// Error when a to-one reference is not declared as a foreign-key union.
///
/// The public to-one form is `Related | KeyType`: a nested record to
/// upsert-and-link, or a bare key to link only. A bare model reference, or
/// a union whose key type does not match the target's primary key, is
/// rejected here rather than producing a column with ambiguous contents.
#[derive(Debug)]
pub(super) struct MustUnionForeignKeyError {
    table: Box<str>,
    field: Box<str>,
    expected: Box<str>,
}

impl std::error::Error for MustUnionForeignKeyError {}

impl core::fmt::Display for MustUnionForeignKeyError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "foreign key must be a union: field `{}.{}` must be declared as `{}`",
            self.table, self.field, self.expected
        )
    }
}

impl Error {
    /// Creates a must-union-foreign-key error for `table.field`, naming the
    /// expected union form (e.g. `users | Uuid`).
    pub fn must_union_foreign_key(
        table: impl Into<String>,
        field: impl Into<String>,
        expected: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::MustUnionForeignKey(
            MustUnionForeignKeyError {
                table: table.into().into(),
                field: field.into().into(),
                expected: expected.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is a must-union-foreign-key error.
    pub fn is_must_union_foreign_key(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::MustUnionForeignKey(_))
    }
}
