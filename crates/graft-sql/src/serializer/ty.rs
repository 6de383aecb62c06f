use super::{Flavor, Formatter};

use graft_core::schema::db::Type;

/// Write a column storage type in the target dialect.
pub(crate) fn write(ty: &Type, f: &mut Formatter<'_>) {
    let flavor = f.serializer.flavor;
    match ty {
        Type::Boolean => f.dst.push_str("BOOLEAN"),
        Type::Integer => f.dst.push_str(match flavor {
            Flavor::Sqlite => "INTEGER",
            Flavor::Postgresql => "BIGINT",
        }),
        Type::Real => f.dst.push_str(match flavor {
            Flavor::Sqlite => "REAL",
            Flavor::Postgresql => "DOUBLE PRECISION",
        }),
        Type::Text => f.dst.push_str("TEXT"),
        Type::VarChar(size) => {
            f.dst.push_str("VARCHAR(");
            f.dst.push_str(&size.to_string());
            f.dst.push(')');
        }
        Type::Uuid => f.dst.push_str("UUID"),
        // Stored as serialized text; both dialects read it back verbatim.
        Type::Json => f.dst.push_str("TEXT"),
    }
}
