use super::Engine;
use crate::Result;

use graft_core::driver::Response;
use graft_sql::Statement;

/// One scoped unit of work: begin, execute statements, then commit or roll
/// back. Every engine operation wraps its statements in one of these via
/// [`UnitOfWork::finish`], so release happens on all exit paths; errors
/// propagate unchanged and nothing is retried.
pub(super) struct UnitOfWork<'a> {
    engine: &'a Engine,
}

impl<'a> UnitOfWork<'a> {
    pub(super) async fn begin(engine: &'a Engine) -> Result<UnitOfWork<'a>> {
        trace_uow!("begin");
        engine.execute_raw("BEGIN;").await?;
        Ok(Self { engine })
    }

    pub(super) async fn execute(&self, statement: &Statement) -> Result<Response> {
        self.engine.execute_statement(statement).await
    }

    /// Commit when the work succeeded, roll back when it failed. The
    /// original error wins over any rollback failure.
    pub(super) async fn finish<T>(self, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                self.commit().await?;
                Ok(value)
            }
            Err(err) => {
                let _ = self.rollback().await;
                Err(err)
            }
        }
    }

    async fn commit(self) -> Result<()> {
        trace_uow!("commit");
        self.engine.execute_raw("COMMIT;").await?;
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        trace_uow!("rollback");
        self.engine.execute_raw("ROLLBACK;").await?;
        Ok(())
    }
}
