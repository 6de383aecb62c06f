#![allow(dead_code)]

use graft::stmt::Value;
use graft::{async_trait, Capability, Driver, Model, Response, Result, SqlDialect, StorageTypes};

use graft_driver_sqlite::Sqlite;

use std::sync::{Arc, Mutex};

use uuid::Uuid;

/// A to-one field value: a bare key to link only, or a full record to
/// upsert-and-link.
#[derive(Debug, Clone, PartialEq)]
pub enum Link<T> {
    Key(Uuid),
    Full(Box<T>),
}

impl<T: Model> Link<T> {
    pub fn full(record: T) -> Self {
        Self::Full(Box::new(record))
    }

    pub fn encode(&self) -> Value {
        match self {
            Self::Key(key) => (*key).into(),
            Self::Full(record) => Value::Record(record.to_row()),
        }
    }

    pub fn encode_opt(link: &Option<Self>) -> Value {
        match link {
            Some(link) => link.encode(),
            None => Value::Null,
        }
    }

    pub fn decode(value: Value) -> Result<Self> {
        match value {
            Value::Record(row) => Ok(Self::Full(Box::new(T::load(row)?))),
            other => Ok(Self::Key(other.to_uuid()?)),
        }
    }

    pub fn decode_opt(value: Value) -> Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            other => Ok(Some(Self::decode(other)?)),
        }
    }

    pub fn key(&self) -> Uuid
    where
        T: HasId,
    {
        match self {
            Self::Key(key) => *key,
            Self::Full(record) => record.id(),
        }
    }
}

/// Test models expose their key for assertions.
pub trait HasId {
    fn id(&self) -> Uuid;
}

/// Encode a to-many field holding full records.
pub fn encode_many<T: Model>(items: &[T]) -> Value {
    Value::List(items.iter().map(|item| Value::Record(item.to_row())).collect())
}

/// Decode a to-many field back into records.
pub fn decode_many<T: Model>(value: Value) -> Result<Vec<T>> {
    value
        .to_list()?
        .into_iter()
        .map(|item| T::load(item.to_record()?))
        .collect()
}

/// A shared handle on the statements a recording driver executed; survives
/// the driver being moved into the `Db`.
#[derive(Debug, Clone, Default)]
pub struct StatementLog(Arc<Mutex<Vec<String>>>);

impl StatementLog {
    pub fn statements(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    fn push(&self, statement: &str) {
        self.0.lock().unwrap().push(statement.to_string());
    }
}

/// An in-memory SQLite driver that records every executed statement, to
/// assert on statement shape and count.
#[derive(Debug)]
pub struct Recording {
    inner: Sqlite,
    log: StatementLog,
}

impl Recording {
    pub fn in_memory() -> Self {
        Self {
            inner: Sqlite::in_memory(),
            log: StatementLog::default(),
        }
    }

    pub fn log(&self) -> StatementLog {
        self.log.clone()
    }
}

#[async_trait]
impl Driver for Recording {
    fn capability(&self) -> &Capability {
        self.inner.capability()
    }

    async fn execute(&self, statement: &str) -> Result<Response> {
        self.log.push(statement);
        self.inner.execute(statement).await
    }
}

/// SQLite with the native-upsert capability masked off, to exercise the
/// look-up-then-insert-or-update fallback.
#[derive(Debug)]
pub struct NoNativeUpsert {
    inner: Recording,
}

const NO_NATIVE_UPSERT: Capability = Capability {
    dialect: SqlDialect::Sqlite,
    storage_types: StorageTypes::SQLITE,
    on_conflict: false,
};

impl NoNativeUpsert {
    pub fn in_memory() -> Self {
        Self {
            inner: Recording::in_memory(),
        }
    }

    pub fn log(&self) -> StatementLog {
        self.inner.log()
    }
}

#[async_trait]
impl Driver for NoNativeUpsert {
    fn capability(&self) -> &Capability {
        &NO_NATIVE_UPSERT
    }

    async fn execute(&self, statement: &str) -> Result<Response> {
        self.inner.execute(statement).await
    }
}
