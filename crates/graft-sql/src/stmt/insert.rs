use graft_core::stmt::Value;

#[derive(Debug, Clone)]
pub struct Insert {
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<Value>,

    /// Native upsert clause; only emitted when the capability supports it.
    pub on_conflict: Option<OnConflict>,
}

#[derive(Debug, Clone)]
pub enum OnConflict {
    /// `ON CONFLICT ({target}) DO NOTHING`
    DoNothing { target: Vec<String> },

    /// `ON CONFLICT ({target}) DO UPDATE SET c = excluded.c, ...`
    DoUpdate {
        target: Vec<String>,
        update: Vec<String>,
    },
}
