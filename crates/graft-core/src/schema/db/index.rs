/// A secondary index, emitted as its own create statement after the table.
#[derive(Debug, Clone)]
pub struct Index {
    pub name: String,

    /// Column indices within the owning table
    pub columns: Vec<usize>,

    pub unique: bool,
}
