mod delim;
use delim::Comma;

mod flavor;
use flavor::Flavor;

mod ident;
use ident::Ident;

// Fragment serializers
mod statement;
mod ty;
mod value;

use crate::stmt::Statement;

use graft_core::driver::SqlDialect;
use graft_core::schema::db::{self, Table, TableId};

/// Serialize a statement to a SQL string.
///
/// Statements are rendered as parameterless literal SQL, since the engine
/// collaborator consumes statement text only. The flavor handles the
/// differences between SQL dialects.
#[derive(Debug)]
pub struct Serializer<'a> {
    /// Schema against which the statement is to be serialized
    schema: &'a db::Schema,

    flavor: Flavor,
}

struct Formatter<'a> {
    /// Handle to the serializer
    serializer: &'a Serializer<'a>,

    /// Where to write the serialized SQL
    dst: &'a mut String,
}

trait ToSql {
    fn to_sql(&self, f: &mut Formatter<'_>);
}

impl<'a> Serializer<'a> {
    pub fn new(schema: &'a db::Schema, dialect: SqlDialect) -> Self {
        match dialect {
            SqlDialect::Sqlite => Self::sqlite(schema),
            SqlDialect::Postgresql => Self::postgresql(schema),
        }
    }

    pub fn sqlite(schema: &'a db::Schema) -> Self {
        Self {
            schema,
            flavor: Flavor::Sqlite,
        }
    }

    pub fn postgresql(schema: &'a db::Schema) -> Self {
        Self {
            schema,
            flavor: Flavor::Postgresql,
        }
    }

    pub fn serialize(&self, stmt: &Statement) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
        };

        stmt.to_sql(&mut fmt);

        ret.push(';');
        ret
    }

    fn table(&self, id: impl Into<TableId>) -> &'a Table {
        self.schema.table(id.into())
    }
}
