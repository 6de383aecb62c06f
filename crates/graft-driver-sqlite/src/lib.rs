mod value;

use rusqlite::Connection as RusqliteConnection;

use graft_core::{
    async_trait,
    driver::{Capability, Driver, Response, RowSet},
    Result,
};

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use url::Url;

/// SQLite driver: executes statement text on one rusqlite connection.
///
/// The connection is guarded by a mutex, so statements from concurrent
/// callers serialize; transaction boundaries across multiple statements are
/// the caller's to scope.
#[derive(Debug)]
pub struct Sqlite {
    connection: Mutex<RusqliteConnection>,
}

impl Sqlite {
    /// Create a new SQLite driver from a `sqlite:` connection URL.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(graft_core::Error::driver_operation_failed)?;

        if url.scheme() != "sqlite" {
            return Err(graft_core::Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            )));
        }

        if url.path() == ":memory:" {
            Ok(Self::in_memory())
        } else {
            Self::open(PathBuf::from(url.path()))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        let connection = RusqliteConnection::open_in_memory().unwrap();

        Self {
            connection: Mutex::new(connection),
        }
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection =
            RusqliteConnection::open(path).map_err(graft_core::Error::driver_operation_failed)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn capability(&self) -> &Capability {
        &Capability::SQLITE
    }

    async fn execute(&self, statement: &str) -> Result<Response> {
        let connection = self.connection.lock().unwrap();

        let mut stmt = connection
            .prepare(statement)
            .map_err(graft_core::Error::driver_operation_failed)?;

        if stmt.column_count() == 0 {
            let count = stmt
                .execute([])
                .map_err(graft_core::Error::driver_operation_failed)?;
            return Ok(Response::count(count as u64));
        }

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut rows = stmt
            .query([])
            .map_err(graft_core::Error::driver_operation_failed)?;

        let mut ret = RowSet {
            columns,
            rows: vec![],
        };

        loop {
            match rows.next() {
                Ok(Some(row)) => {
                    let mut cells = vec![];
                    for index in 0..ret.columns.len() {
                        cells.push(value::from_sql(row, index)?);
                    }
                    ret.rows.push(cells);
                }
                Ok(None) => break,
                Err(err) => {
                    return Err(graft_core::Error::driver_operation_failed(err));
                }
            }
        }

        Ok(Response::row_set(ret))
    }
}
