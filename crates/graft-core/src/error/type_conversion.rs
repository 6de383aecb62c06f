use super::Error;

/// Error when a declared field type has no mapping to a storage column type.
#[derive(Debug)]
pub(super) struct TypeConversionError {
    message: Box<str>,
}

impl std::error::Error for TypeConversionError {}

impl core::fmt::Display for TypeConversionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "type conversion: {}", self.message)
    }
}

impl Error {
    /// Creates a type conversion error. Raised during schema resolution when
    /// a declared type cannot be stored in a column.
    pub fn type_conversion(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::TypeConversion(TypeConversionError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a type conversion error.
    pub fn is_type_conversion(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::TypeConversion(_))
    }
}
