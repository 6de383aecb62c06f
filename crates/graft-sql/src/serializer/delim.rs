use super::{Formatter, ToSql};

/// Writes a slice of fragments separated by `, `.
pub(crate) struct Comma<'a, T>(pub(crate) &'a [T]);

impl<T: ToSql> ToSql for Comma<'_, T> {
    fn to_sql(&self, f: &mut Formatter<'_>) {
        for (index, item) in self.0.iter().enumerate() {
            if index > 0 {
                f.dst.push_str(", ");
            }
            item.to_sql(f);
        }
    }
}
