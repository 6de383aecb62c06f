use super::Error;

/// Error when a to-many relation field has no back reference declared.
///
/// Collections of a declared model can only be resolved through a field on
/// the far side pointing back at the owner; without one the relation kind
/// (one-to-many vs. many-to-many) is undecidable.
#[derive(Debug)]
pub(super) struct UndefinedBackReferenceError {
    table: Box<str>,
    field: Box<str>,
    foreign_table: Box<str>,
}

impl std::error::Error for UndefinedBackReferenceError {}

impl core::fmt::Display for UndefinedBackReferenceError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "undefined back reference: to-many relation `{}.{}` requires a back \
             reference declared on table `{}`",
            self.table, self.field, self.foreign_table
        )
    }
}

impl Error {
    /// Creates an undefined back reference error for the to-many field
    /// `table.field` targeting `foreign_table`.
    pub fn undefined_back_reference(
        table: impl Into<String>,
        field: impl Into<String>,
        foreign_table: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::UndefinedBackReference(
            UndefinedBackReferenceError {
                table: table.into().into(),
                field: field.into().into(),
                foreign_table: foreign_table.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an undefined back reference error.
    pub fn is_undefined_back_reference(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UndefinedBackReference(_))
    }
}
