use super::Error;

/// Error when a back-referenced field exists but is typed incorrectly.
///
/// The far-side field named by a back reference must itself refer back to
/// the owning model, either as a to-one union (one-to-many pair) or as a
/// collection of the owning model (many-to-many pair).
#[derive(Debug)]
pub(super) struct MismatchingBackReferenceError {
    table: Box<str>,
    field: Box<str>,
    foreign_table: Box<str>,
    back_reference: Box<str>,
}

impl std::error::Error for MismatchingBackReferenceError {}

impl core::fmt::Display for MismatchingBackReferenceError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "mismatching back reference: to-many relation `{}.{}` is \
             back-referenced by `{}.{}`, which does not refer back to `{}`",
            self.table, self.field, self.foreign_table, self.back_reference, self.table
        )
    }
}

impl Error {
    /// Creates a mismatching back reference error for `table.field`, whose
    /// back reference `foreign_table.back_reference` has the wrong type.
    pub fn mismatching_back_reference(
        table: impl Into<String>,
        field: impl Into<String>,
        foreign_table: impl Into<String>,
        back_reference: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::MismatchingBackReference(
            MismatchingBackReferenceError {
                table: table.into().into(),
                field: field.into().into(),
                foreign_table: foreign_table.into().into(),
                back_reference: back_reference.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is a mismatching back reference error.
    pub fn is_mismatching_back_reference(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::MismatchingBackReference(_))
    }
}
