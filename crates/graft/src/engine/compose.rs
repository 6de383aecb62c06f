use crate::Schema;

use graft_core::schema::app::Model;
use graft_sql::stmt::{ColumnRef, Join, Select, SelectColumn, TableRef};
use graft_sql::ColumnAlias;

/// Build the single SELECT for a root table at a fetch depth: the root's
/// columns plus, while depth remains, a LEFT JOIN per to-one relation,
/// recursively. Each joined occurrence is aliased by its join path, so a
/// table reached through different branches (or joined to itself) never
/// collides; every output column carries its encoded [`ColumnAlias`].
///
/// To-many relations are never joined here; flattening them into this
/// statement would multiply root rows ambiguously. The relation fetcher
/// issues bounded secondary queries instead.
pub(super) fn compose(schema: &Schema, model: &Model, depth: u32) -> (Select, Vec<ColumnAlias>) {
    let mut select = Select::new(TableRef::new(
        model.table_name.as_str(),
        model.table_name.as_str(),
    ));
    let mut aliases = vec![];

    expand(
        schema,
        model,
        vec![model.table_name.clone()],
        depth,
        &mut select,
        &mut aliases,
    );

    (select, aliases)
}

fn expand(
    schema: &Schema,
    model: &Model,
    path: Vec<String>,
    depth: u32,
    select: &mut Select,
    aliases: &mut Vec<ColumnAlias>,
) {
    let table_alias = path.join("/");

    for field in model.column_fields() {
        let alias = ColumnAlias {
            path: path.clone(),
            depth,
            column: field.name.clone(),
        };
        select.columns.push(SelectColumn {
            table: table_alias.clone(),
            column: field.name.clone(),
            alias: alias.to_string(),
        });
        aliases.push(alias);
    }

    if depth == 0 {
        return;
    }

    for field in model.belongs_to_fields() {
        let belongs_to = field.ty.expect_belongs_to();
        let target = schema.model(belongs_to.target);

        let mut child_path = path.clone();
        child_path.push(field.name.clone());
        let child_alias = child_path.join("/");

        select.joins.push(Join {
            table: TableRef::new(target.table_name.as_str(), child_alias.clone()),
            lhs: ColumnRef::new(table_alias.as_str(), field.name.as_str()),
            rhs: ColumnRef::new(child_alias, target.primary_key_field().name.as_str()),
        });

        expand(schema, target, child_path, depth - 1, select, aliases);
    }
}
