use super::FieldId;

/// A secondary index or uniqueness constraint over one or more fields.
#[derive(Debug, Clone)]
pub struct Index {
    pub fields: Vec<FieldId>,
    pub unique: bool,
}
