use crate::driver::Capability;
use crate::schema::app::{self, FieldTy};
use crate::schema::db::{Column, ColumnId, ForeignKey, Index, Table, TableId, Type, UniqueConstraint};

/// Lower the resolved application schema to physical table definitions:
/// one table per model (in model order), then one per join-table
/// descriptor. Join tables are emitted exactly once no matter how many
/// relation fields reference them, since the descriptors themselves are
/// deduplicated during resolution.
pub(super) fn lower(app: &app::Schema, capability: &Capability) -> Vec<Table> {
    let mut tables = vec![];

    for model in app.models() {
        tables.push(lower_model(app, model, capability));
    }
    for join_table in &app.join_tables {
        let id = TableId(tables.len());
        tables.push(lower_join_table(app, join_table, id, capability));
    }

    tables
}

fn lower_model(app: &app::Schema, model: &app::Model, capability: &Capability) -> Table {
    let storage = &capability.storage_types;
    let id = TableId(model.id.0);
    let mut table = Table::new(id, model.table_name.clone());

    // Column position by field index, for index/constraint lowering below.
    let mut positions = vec![usize::MAX; model.fields.len()];

    for field in model.column_fields() {
        let index = table.columns.len();
        positions[field.id.index] = index;

        let (ty, references) = match &field.ty {
            FieldTy::Primitive(primitive) => (Type::from_app(&primitive.ty, storage), None),
            FieldTy::BelongsTo(belongs_to) => {
                let target = belongs_to.target(app);
                (
                    Type::from_app(&belongs_to.key_ty, storage),
                    Some(ForeignKey {
                        table: target.table_name.clone(),
                        column: target.primary_key_field().name.clone(),
                    }),
                )
            }
            FieldTy::HasMany(_) | FieldTy::ManyToMany(_) => unreachable!(),
        };

        table.columns.push(Column {
            id: ColumnId { table: id, index },
            name: field.name.clone(),
            ty,
            nullable: field.nullable,
            primary_key: field.primary_key,
            unique: false,
            references,
        });
    }

    table.primary_key = Some(ColumnId {
        table: id,
        index: positions[model.primary_key.index],
    });

    for index in &model.indices {
        let columns: Vec<usize> = index
            .fields
            .iter()
            .map(|field| positions[field.index])
            .collect();
        match (&columns[..], index.unique) {
            ([column], true) => table.columns[*column].unique = true,
            (_, true) => table
                .unique_constraints
                .push(UniqueConstraint { columns }),
            (_, false) => {
                let name = index_name(&table, &columns);
                table.indices.push(Index {
                    name,
                    columns,
                    unique: false,
                });
            }
        }
    }

    table
}

fn lower_join_table(
    app: &app::Schema,
    join_table: &app::JoinTable,
    id: TableId,
    capability: &Capability,
) -> Table {
    let storage = &capability.storage_types;
    let mut table = Table::new(id, join_table.name.clone());

    for (index, side) in [&join_table.lhs, &join_table.rhs].into_iter().enumerate() {
        let model = app.model(side.model);
        table.columns.push(Column {
            id: ColumnId { table: id, index },
            name: side.column.clone(),
            ty: Type::from_app(model.key_ty(), storage),
            nullable: false,
            primary_key: false,
            unique: false,
            references: Some(ForeignKey {
                table: model.table_name.clone(),
                column: model.primary_key_field().name.clone(),
            }),
        });
    }

    // Each pair links at most once.
    table.unique_constraints.push(UniqueConstraint {
        columns: vec![0, 1],
    });

    table
}

fn index_name(table: &Table, columns: &[usize]) -> String {
    let mut name = table.name.clone();
    for column in columns {
        name.push('_');
        name.push_str(&table.columns[*column].name);
    }
    name.push_str("_idx");
    name
}
