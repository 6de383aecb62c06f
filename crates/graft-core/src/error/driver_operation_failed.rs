use super::Error;

/// Error when the underlying engine fails to execute a statement.
///
/// Engine failures (constraint violations, connectivity loss, malformed
/// statements) are propagated to the caller unchanged; the core performs no
/// retry and no partial-result suppression.
#[derive(Debug)]
pub(super) struct DriverOperationFailedError {
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl DriverOperationFailedError {
    pub(super) fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl std::error::Error for DriverOperationFailedError {}

impl core::fmt::Display for DriverOperationFailedError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "driver operation failed: {}", self.source)
    }
}

impl Error {
    /// Wraps an engine error, preserving it as the error source.
    pub fn driver_operation_failed(
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Error {
        Error::from(super::ErrorKind::DriverOperationFailed(
            DriverOperationFailedError {
                source: Box::new(source),
            },
        ))
    }

    /// Returns `true` if this error is a driver operation failure.
    pub fn is_driver_operation_failed(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::DriverOperationFailed(_))
    }
}
