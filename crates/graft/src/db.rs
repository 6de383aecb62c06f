mod builder;
pub use builder::Builder;

use crate::{collection::Collection, engine::Engine, Error, Model, Result, Schema};

use std::marker::PhantomData;
use std::sync::Arc;

/// A database handle: the resolved schema plus the driver it talks to.
/// Cloning is cheap; all clones share the same schema and driver.
#[derive(Clone)]
pub struct Db {
    pub(crate) engine: Arc<Engine>,
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db").finish_non_exhaustive()
    }
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Schema {
        &self.engine.schema
    }

    /// The typed CRUD handle for a registered model.
    pub fn collection<M: Model>(&self) -> Result<Collection<'_, M>> {
        let model = self
            .engine
            .schema
            .app
            .model_by_name(M::NAME)
            .ok_or_else(|| {
                Error::invalid_schema(format!("model `{}` is not registered", M::NAME))
            })?;
        Ok(Collection {
            db: self,
            model: model.id,
            _marker: PhantomData,
        })
    }
}
