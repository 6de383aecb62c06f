use crate::driver::StorageTypes;
use crate::stmt;

/// A column storage type, from the database's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Boolean,
    Integer,
    Real,
    Text,
    VarChar(u64),

    /// Native UUID column; engines without one store text instead (see
    /// [`StorageTypes::uuid`]).
    Uuid,

    /// Serialized JSON text
    Json,
}

impl Type {
    /// Lower an application-level type to the storage type the target
    /// database uses for it.
    pub fn from_app(ty: &stmt::Type, storage: &StorageTypes) -> Self {
        match ty {
            stmt::Type::Bool => Self::Boolean,
            stmt::Type::I64 => Self::Integer,
            stmt::Type::F64 => Self::Real,
            stmt::Type::Text { max: None } => storage.default_string_type.clone(),
            stmt::Type::Text { max: Some(max) } => match storage.varchar {
                Some(limit) if *max <= limit => Self::VarChar(*max),
                _ => storage.default_string_type.clone(),
            },
            stmt::Type::Uuid => storage.uuid.clone(),
            stmt::Type::Json => Self::Json,
        }
    }
}
