use super::{Formatter, ToSql};

/// A double-quoted SQL identifier. Embedded quotes are doubled, which
/// matters for alias labels carrying the `//` separators, not for schema
/// identifiers (those are restricted at resolution time).
pub(crate) struct Ident<T>(pub(crate) T);

impl<T: AsRef<str>> ToSql for Ident<T> {
    fn to_sql(&self, f: &mut Formatter<'_>) {
        f.dst.push('"');
        for c in self.0.as_ref().chars() {
            if c == '"' {
                f.dst.push('"');
            }
            f.dst.push(c);
        }
        f.dst.push('"');
    }
}
