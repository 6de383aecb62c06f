use super::Db;
use crate::{engine::Engine, Driver, Model, Result, Schema};

use graft_core::schema::app::ModelDecl;

use std::sync::Arc;

/// Registers models, then connects: resolve the schema once, create the
/// tables, and hand back a [`Db`]. The builder is plain owned state; nothing
/// registers globally.
#[derive(Default)]
pub struct Builder {
    decls: Vec<ModelDecl>,
}

impl Builder {
    /// Register a model type.
    pub fn model<M: Model>(&mut self) -> &mut Self {
        self.decls.push(M::schema());
        self
    }

    /// Register an already-built declaration, for callers without a typed
    /// model.
    pub fn decl(&mut self, decl: ModelDecl) -> &mut Self {
        self.decls.push(decl);
        self
    }

    /// Resolve the schema against the driver's capability, create every
    /// table and index, and return the handle. Configuration errors abort
    /// here; they can no longer occur once `connect` returns.
    pub async fn connect(&self, driver: impl Driver) -> Result<Db> {
        let mut schema = Schema::builder();
        for decl in &self.decls {
            schema.model(decl.clone());
        }
        let schema = schema.build(driver.capability())?;

        let engine = Engine::new(Arc::new(schema), Arc::new(driver));
        engine.create_tables().await?;

        Ok(Db {
            engine: Arc::new(engine),
        })
    }
}
