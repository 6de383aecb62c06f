mod capability;
pub use capability::{Capability, SqlDialect, StorageTypes};

mod response;
pub use response::{Response, Rows, RowSet};

use crate::{async_trait, Result};

use std::fmt::Debug;

/// The abstract SQL engine collaborator.
///
/// The core hands the driver fully serialized, parameterless statement text
/// and gets back ordered named rows (or an affected-row count). Connection
/// pooling, timeouts, and transaction isolation are the driver's business.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Describes the driver's capability, which informs schema lowering and
    /// statement generation.
    fn capability(&self) -> &Capability;

    /// Execute a single statement.
    async fn execute(&self, statement: &str) -> Result<Response>;
}
