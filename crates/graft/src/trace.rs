//! Tracing hooks for statement and unit-of-work observability.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! The macros no-op when the feature is disabled, avoiding `#[cfg]`
//! boilerplate at every call site.

/// Emit a debug-level event with the statement text about to be executed.
macro_rules! trace_query {
    ($sql:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(sql = %$sql, "graft.query");
    };
}

/// Emit an info-level event for unit-of-work lifecycle (begin, commit,
/// rollback).
macro_rules! trace_uow {
    ($event:literal) => {
        #[cfg(feature = "tracing")]
        tracing::info!(event = $event, "graft.unit_of_work");
    };
}
