use super::{value, Comma, Formatter, Ident, ToSql};

use crate::stmt::{
    ColumnRef, CreateIndex, CreateTable, Delete, Expr, Insert, Join, OnConflict, OrderBy, Select,
    SelectColumn, Statement, TableRef, Update,
};

use graft_core::schema::db::Column;

use std::fmt::Write;

impl ToSql for Statement {
    fn to_sql(&self, f: &mut Formatter<'_>) {
        match self {
            Self::CreateIndex(stmt) => stmt.to_sql(f),
            Self::CreateTable(stmt) => stmt.to_sql(f),
            Self::Delete(stmt) => stmt.to_sql(f),
            Self::Insert(stmt) => stmt.to_sql(f),
            Self::Select(stmt) => stmt.to_sql(f),
            Self::Update(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for CreateTable {
    fn to_sql(&self, f: &mut Formatter<'_>) {
        let table = f.serializer.table(self.table);

        f.dst.push_str("CREATE TABLE ");
        Ident(&table.name).to_sql(f);
        f.dst.push_str(" (");

        for column in &table.columns {
            f.dst.push_str("\n    ");
            column_def(column, f);
            f.dst.push(',');
        }

        match table.primary_key_column() {
            Some(pk) => {
                f.dst.push_str("\n    PRIMARY KEY (");
                Ident(&pk.name).to_sql(f);
                f.dst.push(')');
            }
            None => {
                // Join tables have no primary key; drop the trailing comma.
                f.dst.pop();
            }
        }

        for constraint in &table.unique_constraints {
            f.dst.push_str(",\n    UNIQUE (");
            let names: Vec<&str> = constraint
                .columns
                .iter()
                .map(|index| table.columns[*index].name.as_str())
                .collect();
            Comma(&names.iter().map(Ident).collect::<Vec<_>>()).to_sql(f);
            f.dst.push(')');
        }

        f.dst.push_str("\n)");
    }
}

fn column_def(column: &Column, f: &mut Formatter<'_>) {
    Ident(&column.name).to_sql(f);
    f.dst.push(' ');
    super::ty::write(&column.ty, f);
    if !column.nullable {
        f.dst.push_str(" NOT NULL");
    }
    if column.unique {
        f.dst.push_str(" UNIQUE");
    }
    if let Some(fk) = &column.references {
        f.dst.push_str(" REFERENCES ");
        Ident(&fk.table).to_sql(f);
        f.dst.push_str(" (");
        Ident(&fk.column).to_sql(f);
        f.dst.push(')');
    }
}

impl ToSql for CreateIndex {
    fn to_sql(&self, f: &mut Formatter<'_>) {
        let table = f.serializer.table(self.table);
        let index = &table.indices[self.index];

        f.dst.push_str("CREATE ");
        if index.unique {
            f.dst.push_str("UNIQUE ");
        }
        f.dst.push_str("INDEX ");
        Ident(&index.name).to_sql(f);
        f.dst.push_str(" ON ");
        Ident(&table.name).to_sql(f);
        f.dst.push_str(" (");
        let names: Vec<&str> = index
            .columns
            .iter()
            .map(|i| table.columns[*i].name.as_str())
            .collect();
        Comma(&names.iter().map(Ident).collect::<Vec<_>>()).to_sql(f);
        f.dst.push(')');
    }
}

impl ToSql for Select {
    fn to_sql(&self, f: &mut Formatter<'_>) {
        f.dst.push_str("SELECT ");
        Comma(&self.columns).to_sql(f);
        f.dst.push_str(" FROM ");
        self.from.to_sql(f);

        for join in &self.joins {
            join.to_sql(f);
        }

        if let Some(filter) = &self.filter {
            f.dst.push_str(" WHERE ");
            filter.to_sql(f);
        }

        if !self.order_by.is_empty() {
            f.dst.push_str(" ORDER BY ");
            Comma(&self.order_by).to_sql(f);
        }

        if let Some(limit) = self.limit {
            write!(f.dst, " LIMIT {limit}").unwrap();
        } else if self.offset.is_some() && f.serializer.flavor == super::Flavor::Sqlite {
            // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded.
            f.dst.push_str(" LIMIT -1");
        }
        if let Some(offset) = self.offset {
            write!(f.dst, " OFFSET {offset}").unwrap();
        }
    }
}

impl ToSql for TableRef {
    fn to_sql(&self, f: &mut Formatter<'_>) {
        Ident(&self.name).to_sql(f);
        f.dst.push_str(" AS ");
        Ident(&self.alias).to_sql(f);
    }
}

impl ToSql for SelectColumn {
    fn to_sql(&self, f: &mut Formatter<'_>) {
        Ident(&self.table).to_sql(f);
        f.dst.push('.');
        Ident(&self.column).to_sql(f);
        f.dst.push_str(" AS ");
        Ident(&self.alias).to_sql(f);
    }
}

impl ToSql for Join {
    fn to_sql(&self, f: &mut Formatter<'_>) {
        f.dst.push_str(" LEFT JOIN ");
        self.table.to_sql(f);
        f.dst.push_str(" ON ");
        self.lhs.to_sql(f);
        f.dst.push_str(" = ");
        self.rhs.to_sql(f);
    }
}

impl ToSql for ColumnRef {
    fn to_sql(&self, f: &mut Formatter<'_>) {
        Ident(&self.table).to_sql(f);
        f.dst.push('.');
        Ident(&self.column).to_sql(f);
    }
}

impl ToSql for Expr {
    fn to_sql(&self, f: &mut Formatter<'_>) {
        match self {
            Self::And(operands) => {
                for (index, operand) in operands.iter().enumerate() {
                    if index > 0 {
                        f.dst.push_str(" AND ");
                    }
                    operand.to_sql(f);
                }
            }
            Self::Eq(column, value) => {
                column.to_sql(f);
                f.dst.push_str(" = ");
                value::write(value, f);
            }
            Self::InList(column, values) => {
                if values.is_empty() {
                    // `IN ()` is not valid SQL; an empty set matches nothing.
                    f.dst.push_str("FALSE");
                    return;
                }
                column.to_sql(f);
                f.dst.push_str(" IN (");
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.dst.push_str(", ");
                    }
                    value::write(value, f);
                }
                f.dst.push(')');
            }
        }
    }
}

impl ToSql for OrderBy {
    fn to_sql(&self, f: &mut Formatter<'_>) {
        self.column.to_sql(f);
        f.dst.push(' ');
        f.dst.push_str(self.direction.as_str());
    }
}

impl ToSql for Insert {
    fn to_sql(&self, f: &mut Formatter<'_>) {
        f.dst.push_str("INSERT INTO ");
        Ident(&self.table).to_sql(f);
        f.dst.push_str(" (");
        let names: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        Comma(&names.iter().map(Ident).collect::<Vec<_>>()).to_sql(f);
        f.dst.push_str(") VALUES (");
        for (index, v) in self.values.iter().enumerate() {
            if index > 0 {
                f.dst.push_str(", ");
            }
            value::write(v, f);
        }
        f.dst.push(')');

        match &self.on_conflict {
            None => {}
            Some(OnConflict::DoNothing { target }) => {
                f.dst.push_str(" ON CONFLICT (");
                let names: Vec<&str> = target.iter().map(String::as_str).collect();
                Comma(&names.iter().map(Ident).collect::<Vec<_>>()).to_sql(f);
                f.dst.push_str(") DO NOTHING");
            }
            Some(OnConflict::DoUpdate { target, update }) => {
                f.dst.push_str(" ON CONFLICT (");
                let names: Vec<&str> = target.iter().map(String::as_str).collect();
                Comma(&names.iter().map(Ident).collect::<Vec<_>>()).to_sql(f);
                f.dst.push_str(") DO UPDATE SET ");
                for (index, column) in update.iter().enumerate() {
                    if index > 0 {
                        f.dst.push_str(", ");
                    }
                    Ident(column).to_sql(f);
                    f.dst.push_str(" = excluded.");
                    Ident(column).to_sql(f);
                }
            }
        }
    }
}

impl ToSql for Update {
    fn to_sql(&self, f: &mut Formatter<'_>) {
        f.dst.push_str("UPDATE ");
        Ident(&self.table).to_sql(f);
        f.dst.push_str(" SET ");
        for (index, (column, v)) in self.assignments.iter().enumerate() {
            if index > 0 {
                f.dst.push_str(", ");
            }
            Ident(column).to_sql(f);
            f.dst.push_str(" = ");
            value::write(v, f);
        }
        f.dst.push_str(" WHERE ");
        self.filter.to_sql(f);
    }
}

impl ToSql for Delete {
    fn to_sql(&self, f: &mut Formatter<'_>) {
        f.dst.push_str("DELETE FROM ");
        Ident(&self.table).to_sql(f);
        f.dst.push_str(" WHERE ");
        self.filter.to_sql(f);
    }
}
