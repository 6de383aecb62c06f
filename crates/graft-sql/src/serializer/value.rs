use super::Formatter;

use graft_core::stmt::Value;

use std::fmt::Write;

/// Write a value as a SQL literal.
///
/// Composite values never reach this point: the mutation planner reduces
/// records to their foreign key and serializes structured values to JSON
/// before statements are built.
pub(crate) fn write(value: &Value, f: &mut Formatter<'_>) {
    match value {
        Value::Null => f.dst.push_str("NULL"),
        Value::Bool(true) => f.dst.push_str("TRUE"),
        Value::Bool(false) => f.dst.push_str("FALSE"),
        Value::I64(v) => write!(f.dst, "{v}").unwrap(),
        Value::F64(v) => write!(f.dst, "{v:?}").unwrap(),
        Value::String(v) => write_str(v, f),
        Value::Uuid(v) => write!(f.dst, "'{v}'").unwrap(),
        Value::Json(v) => {
            let text = serde_json::to_string(v).expect("JSON value serializes");
            write_str(&text, f);
        }
        Value::Record(_) | Value::List(_) => {
            panic!("composite value has no SQL literal form; value={value:?}")
        }
    }
}

fn write_str(v: &str, f: &mut Formatter<'_>) {
    f.dst.push('\'');
    for c in v.chars() {
        if c == '\'' {
            f.dst.push('\'');
        }
        f.dst.push(c);
    }
    f.dst.push('\'');
}
