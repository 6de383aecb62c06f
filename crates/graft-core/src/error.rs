mod driver_operation_failed;
mod invalid_connection_url;
mod invalid_result;
mod invalid_schema;
mod mismatching_back_reference;
mod must_union_foreign_key;
mod type_conversion;
mod undefined_back_reference;

use driver_operation_failed::DriverOperationFailedError;
use invalid_connection_url::InvalidConnectionUrlError;
use invalid_result::InvalidResultError;
use invalid_schema::InvalidSchemaError;
use mismatching_back_reference::MismatchingBackReferenceError;
use must_union_foreign_key::MustUnionForeignKeyError;
use type_conversion::TypeConversionError;
use undefined_back_reference::UndefinedBackReferenceError;

use std::sync::Arc;

/// An error that can occur in Graft.
///
/// Configuration errors (back references, foreign-key unions, column type
/// mapping) are only produced while a schema is being resolved; once
/// resolution succeeds they can no longer occur. Request-time errors are
/// either driver failures, propagated unchanged, or result-shape mismatches.
#[derive(Clone)]
pub struct Error {
    kind: Arc<ErrorKind>,
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    DriverOperationFailed(DriverOperationFailedError),
    InvalidConnectionUrl(InvalidConnectionUrlError),
    InvalidResult(InvalidResultError),
    InvalidSchema(InvalidSchemaError),
    MismatchingBackReference(MismatchingBackReferenceError),
    MustUnionForeignKey(MustUnionForeignKeyError),
    TypeConversion(TypeConversionError),
    UndefinedBackReference(UndefinedBackReferenceError),
}

impl Error {
    fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns `true` if this is any of the schema-resolution
    /// (configuration) errors, which abort initialization.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidSchema(_)
                | ErrorKind::MismatchingBackReference(_)
                | ErrorKind::MustUnionForeignKey(_)
                | ErrorKind::TypeConversion(_)
                | ErrorKind::UndefinedBackReference(_)
        )
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            ErrorKind::DriverOperationFailed(err) => err.source(),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self.kind(), f)
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if f.alternate() {
            f.debug_struct("Error").field("kind", &self.kind).finish()
        } else {
            core::fmt::Display::fmt(self, f)
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            DriverOperationFailed(err) => core::fmt::Display::fmt(err, f),
            InvalidConnectionUrl(err) => core::fmt::Display::fmt(err, f),
            InvalidResult(err) => core::fmt::Display::fmt(err, f),
            InvalidSchema(err) => core::fmt::Display::fmt(err, f),
            MismatchingBackReference(err) => core::fmt::Display::fmt(err, f),
            MustUnionForeignKey(err) => core::fmt::Display::fmt(err, f),
            TypeConversion(err) => core::fmt::Display::fmt(err, f),
            UndefinedBackReference(err) => core::fmt::Display::fmt(err, f),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            kind: Arc::new(kind),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

impl From<uuid::Error> for Error {
    fn from(err: uuid::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}
