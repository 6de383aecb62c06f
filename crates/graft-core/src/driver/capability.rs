use crate::schema::db;

#[derive(Debug)]
pub struct Capability {
    /// The SQL dialect the driver speaks
    pub dialect: SqlDialect,

    /// Column storage types supported by the database
    pub storage_types: StorageTypes,

    /// SQL: supports `INSERT ... ON CONFLICT`. Dialects without it fall
    /// back to a look-up-then-insert-or-update upsert sequence.
    pub on_conflict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    Sqlite,
    Postgresql,
}

#[derive(Debug)]
pub struct StorageTypes {
    /// The default storage type for a string.
    pub default_string_type: db::Type,

    /// When `Some` the database supports varchar types with the specified
    /// upper limit.
    pub varchar: Option<u64>,

    /// The storage type used for UUID values.
    pub uuid: db::Type,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        dialect: SqlDialect::Sqlite,
        storage_types: StorageTypes::SQLITE,
        on_conflict: true,
    };

    /// PostgreSQL capabilities
    pub const POSTGRESQL: Self = Self {
        dialect: SqlDialect::Postgresql,
        storage_types: StorageTypes::POSTGRESQL,
        on_conflict: true,
    };
}

impl StorageTypes {
    /// SQLite storage types. SQLite ignores the length in `VARCHAR(N)`
    /// (everything with text affinity is just TEXT) and has no UUID type.
    pub const SQLITE: StorageTypes = StorageTypes {
        default_string_type: db::Type::Text,
        varchar: None,
        uuid: db::Type::Text,
    };

    /// PostgreSQL storage types
    pub const POSTGRESQL: StorageTypes = StorageTypes {
        default_string_type: db::Type::Text,
        varchar: Some(65_535),
        uuid: db::Type::Uuid,
    };
}
