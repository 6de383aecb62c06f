#[macro_use]
mod trace;

mod collection;
pub use collection::{Collection, FindMany, Page};

pub mod db;
pub use db::Db;

mod engine;

mod model;
pub use model::Model;

pub use graft_core::{
    async_trait,
    driver::{self, Capability, Driver, Response, SqlDialect, StorageTypes},
    schema::{self, app::DeclTy, app::FieldDecl, app::ModelDecl},
    stmt, Error, Result, Schema,
};
pub use graft_sql::stmt::Direction;
