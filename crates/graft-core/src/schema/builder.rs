mod table;

use super::app::{
    BelongsTo, DeclTy, Field, FieldDecl, FieldId, FieldPrimitive, FieldTy, HasMany, Index,
    JoinTable, JoinTableId, JoinTableSide, ManyToMany, Model, ModelDecl, ModelId,
};
use super::{app, db, Schema};
use crate::driver::Capability;
use crate::{Error, Result};

use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Collects model declarations and resolves them into a [`Schema`].
///
/// Resolution runs in two explicit passes: first every declaration is
/// registered and validated in isolation, then cross-references are resolved
/// by name lookup. Forward and cyclic references need no special handling
/// because no relation is classified until every model is registered, and
/// classification reads only the declarations, so the outcome does not
/// depend on declaration order.
#[derive(Debug, Default)]
pub struct Builder {
    decls: Vec<ModelDecl>,
}

/// Used to track state during the build process
struct BuildSchema<'a> {
    decls: &'a [ModelDecl],

    /// Maps model names to identifiers, reserved before any relation is
    /// resolved.
    ids: IndexMap<String, ModelId>,

    /// Join tables as they are synthesized
    join_tables: Vec<JoinTable>,

    /// Canonical (sorted) relation pair -> join table, so the second
    /// direction reuses the descriptor created by the first.
    join_lookup: BTreeMap<JoinKey, JoinTableId>,
}

/// Both sides of a many-to-many pair as (table name, field name), sorted.
type JoinKey = ((String, String), (String, String));

impl Builder {
    pub fn model(&mut self, decl: ModelDecl) -> &mut Self {
        self.decls.push(decl);
        self
    }

    pub fn build(&self, capability: &Capability) -> Result<Schema> {
        let mut builder = BuildSchema {
            decls: &self.decls,
            ids: IndexMap::new(),
            join_tables: vec![],
            join_lookup: BTreeMap::new(),
        };

        // Pass 1: register and validate every declaration in isolation.
        for (index, decl) in self.decls.iter().enumerate() {
            builder.register(decl, ModelId(index))?;
        }

        // Pass 2: resolve cross-references by name.
        let mut models = vec![];
        for (index, decl) in self.decls.iter().enumerate() {
            models.push(builder.resolve_model(decl, ModelId(index))?);
        }

        let join_tables = builder.join_tables;
        for join_table in &join_tables {
            if builder.ids.contains_key(&join_table.name)
                || self.decls.iter().any(|d| d.table_name == join_table.name)
            {
                return Err(Error::invalid_schema(format!(
                    "join table name `{}` collides with a declared table",
                    join_table.name
                )));
            }
        }

        let app = app::Schema::new(models, join_tables);
        let tables = table::lower(&app, capability);

        Ok(Schema {
            app,
            db: Arc::new(db::Schema { tables }),
        })
    }
}

impl BuildSchema<'_> {
    fn register(&mut self, decl: &ModelDecl, id: ModelId) -> Result<()> {
        verify_ident(&decl.name, "model name")?;
        verify_ident(&decl.table_name, "table name")?;

        if self.ids.insert(decl.name.clone(), id).is_some() {
            return Err(Error::invalid_schema(format!(
                "duplicate model name `{}`",
                decl.name
            )));
        }
        if self
            .decls
            .iter()
            .filter(|other| other.table_name == decl.table_name)
            .count()
            > 1
        {
            return Err(Error::invalid_schema(format!(
                "duplicate table name `{}`",
                decl.table_name
            )));
        }

        for field in &decl.fields {
            verify_ident(&field.name, "field name")?;
            if decl.fields.iter().filter(|f| f.name == field.name).count() > 1 {
                return Err(Error::invalid_schema(format!(
                    "duplicate field `{}.{}`",
                    decl.name, field.name
                )));
            }
        }

        let Some(pk) = decl.field_decl(&decl.primary_key) else {
            return Err(Error::invalid_schema(format!(
                "model `{}` has no field `{}` to use as its primary key",
                decl.name, decl.primary_key
            )));
        };
        if !matches!(pk.ty, DeclTy::Scalar(_)) {
            return Err(Error::invalid_schema(format!(
                "primary key `{}.{}` must be a scalar column",
                decl.name, decl.primary_key
            )));
        }

        for name in decl
            .indexed
            .iter()
            .chain(&decl.unique)
            .chain(decl.unique_together.iter().flatten())
            .chain(decl.back_references.keys())
        {
            if decl.field_decl(name).is_none() {
                return Err(Error::invalid_schema(format!(
                    "model `{}` references unknown field `{}`",
                    decl.name, name
                )));
            }
        }

        Ok(())
    }

    fn resolve_model(&mut self, decl: &ModelDecl, id: ModelId) -> Result<Model> {
        let mut fields = vec![];
        for (index, field) in decl.fields.iter().enumerate() {
            let field_id = id.field(index);
            let primary_key = field.name == decl.primary_key;
            fields.push(Field {
                id: field_id,
                name: field.name.clone(),
                ty: self.resolve_field(decl, field, field_id)?,
                nullable: field.nullable && !primary_key,
                primary_key,
            });
        }

        let primary_key = fields
            .iter()
            .find(|field| field.primary_key)
            .map(|field| field.id)
            .expect("primary key verified during registration");

        let indices = self.resolve_indices(decl, &fields)?;

        Ok(Model {
            id,
            name: decl.name.clone(),
            table_name: decl.table_name.clone(),
            fields,
            primary_key,
            indices,
        })
    }

    /// Classify one declared field. All configuration errors surface here,
    /// never at request time.
    fn resolve_field(
        &mut self,
        decl: &ModelDecl,
        field: &FieldDecl,
        field_id: FieldId,
    ) -> Result<FieldTy> {
        match &field.ty {
            DeclTy::Scalar(ty) => Ok(FieldPrimitive { ty: ty.clone() }.into()),
            DeclTy::Model(name) => {
                if let Some(target) = self.ids.get(name) {
                    let target_decl = &self.decls[target.0];
                    Err(Error::must_union_foreign_key(
                        &decl.table_name,
                        &field.name,
                        expected_union(name, target_decl),
                    ))
                } else {
                    Err(Error::type_conversion(format!(
                        "field `{}.{}` refers to `{}`, which is not a registered model",
                        decl.table_name, field.name, name
                    )))
                }
            }
            DeclTy::Union(name, key_ty) => {
                let Some(&target) = self.ids.get(name) else {
                    return Err(Error::type_conversion(format!(
                        "field `{}.{}` refers to `{}`, which is not a registered model",
                        decl.table_name, field.name, name
                    )));
                };
                let target_decl = &self.decls[target.0];
                let target_key_ty = match &target_decl
                    .field_decl(&target_decl.primary_key)
                    .expect("primary key verified during registration")
                    .ty
                {
                    DeclTy::Scalar(ty) => ty,
                    _ => unreachable!("primary key verified to be scalar"),
                };
                if key_ty != target_key_ty {
                    return Err(Error::must_union_foreign_key(
                        &decl.table_name,
                        &field.name,
                        expected_union(name, target_decl),
                    ));
                }
                Ok(BelongsTo {
                    target,
                    key_ty: key_ty.clone(),
                    pair: self.find_belongs_to_pair(decl, field, target),
                }
                .into())
            }
            DeclTy::List(elem) => self.resolve_collection(decl, field, field_id, elem),
        }
    }

    fn resolve_collection(
        &mut self,
        decl: &ModelDecl,
        field: &FieldDecl,
        field_id: FieldId,
        elem: &DeclTy,
    ) -> Result<FieldTy> {
        let DeclTy::Model(name) = elem else {
            // Collections of anything but a declared model are stored as
            // JSON text.
            return match elem {
                DeclTy::Scalar(_) | DeclTy::List(_) => Ok(FieldPrimitive {
                    ty: crate::stmt::Type::Json,
                }
                .into()),
                DeclTy::Union(..) => Err(Error::type_conversion(format!(
                    "field `{}.{}` is a collection of a foreign-key union, \
                     which has no storage mapping",
                    decl.table_name, field.name
                ))),
                DeclTy::Model(_) => unreachable!(),
            };
        };

        let Some(&target) = self.ids.get(name) else {
            return Err(Error::type_conversion(format!(
                "field `{}.{}` refers to `{}`, which is not a registered model",
                decl.table_name, field.name, name
            )));
        };
        let target_decl = &self.decls[target.0];

        let Some(back_ref) = decl.back_references.get(&field.name) else {
            return Err(Error::undefined_back_reference(
                &decl.table_name,
                &field.name,
                &target_decl.table_name,
            ));
        };

        let Some(far_index) = target_decl
            .fields
            .iter()
            .position(|far| far.name == *back_ref)
        else {
            return Err(Error::mismatching_back_reference(
                &decl.table_name,
                &field.name,
                &target_decl.table_name,
                back_ref,
            ));
        };
        let far = &target_decl.fields[far_index];
        let pair = target.field(far_index);

        match &far.ty {
            // The far side holds the foreign key: this is the "many" side
            // of a one-to-many pair. No join table.
            DeclTy::Union(owner, _) if *owner == decl.name => {
                Ok(HasMany { target, pair }.into())
            }
            // Both sides are collections of each other: many-to-many.
            DeclTy::List(inner) if **inner == DeclTy::Model(decl.name.clone()) => {
                let (join_table, owns_lhs) = self.join_table(
                    (&decl.table_name, &field.name, field_id.model),
                    (&target_decl.table_name, back_ref, target),
                );
                Ok(ManyToMany {
                    target,
                    pair,
                    join_table,
                    owns_lhs,
                }
                .into())
            }
            _ => Err(Error::mismatching_back_reference(
                &decl.table_name,
                &field.name,
                &target_decl.table_name,
                back_ref,
            )),
        }
    }

    /// The to-many field on `target` that declares this belongs-to field as
    /// its back reference, if any.
    fn find_belongs_to_pair(
        &self,
        decl: &ModelDecl,
        field: &FieldDecl,
        target: ModelId,
    ) -> Option<FieldId> {
        let target_decl = &self.decls[target.0];
        target_decl.fields.iter().enumerate().find_map(|(index, far)| {
            let DeclTy::List(elem) = &far.ty else {
                return None;
            };
            let is_owner = matches!(&**elem, DeclTy::Model(name) if *name == decl.name);
            let refers_here = target_decl.back_references.get(&far.name) == Some(&field.name);
            (is_owner && refers_here).then(|| target.field(index))
        })
    }

    /// Get or synthesize the join table for a many-to-many pair. Sides are
    /// sorted by (table, field) so either direction resolves to the same
    /// descriptor; columns are named after each side's table, suffixed
    /// `_a`/`_b` when the relation is self-referential.
    fn join_table(
        &mut self,
        a: (&str, &str, ModelId),
        b: (&str, &str, ModelId),
    ) -> (JoinTableId, bool) {
        let owns_lhs = (a.0, a.1) <= (b.0, b.1);
        let (lhs, rhs) = if owns_lhs { (a, b) } else { (b, a) };

        let key = (
            (lhs.0.to_string(), lhs.1.to_string()),
            (rhs.0.to_string(), rhs.1.to_string()),
        );
        if let Some(&id) = self.join_lookup.get(&key) {
            return (id, owns_lhs);
        }

        let (lhs_column, rhs_column) = if lhs.0 == rhs.0 {
            (format!("{}_a", lhs.0), format!("{}_b", rhs.0))
        } else {
            (lhs.0.to_string(), rhs.0.to_string())
        };

        let id = JoinTableId(self.join_tables.len());
        self.join_tables.push(JoinTable {
            id,
            name: format!("{}_{}__{}_{}", lhs.0, lhs.1, rhs.0, rhs.1),
            lhs: JoinTableSide {
                model: lhs.2,
                column: lhs_column,
            },
            rhs: JoinTableSide {
                model: rhs.2,
                column: rhs_column,
            },
        });
        self.join_lookup.insert(key, id);
        (id, owns_lhs)
    }

    fn resolve_indices(&self, decl: &ModelDecl, fields: &[Field]) -> Result<Vec<Index>> {
        let field_id = |name: &str| -> Result<FieldId> {
            let field = fields
                .iter()
                .find(|field| field.name == name)
                .expect("field names verified during registration");
            if !field.is_column() {
                return Err(Error::invalid_schema(format!(
                    "`{}.{}` is a to-many relation and cannot be indexed",
                    decl.name, name
                )));
            }
            Ok(field.id)
        };

        let mut indices = vec![];
        for name in &decl.indexed {
            indices.push(Index {
                fields: vec![field_id(name)?],
                unique: false,
            });
        }
        for name in &decl.unique {
            indices.push(Index {
                fields: vec![field_id(name)?],
                unique: true,
            });
        }
        for names in &decl.unique_together {
            indices.push(Index {
                fields: names.iter().map(|name| field_id(name)).collect::<Result<_>>()?,
                unique: true,
            });
        }
        Ok(indices)
    }
}

/// The union form an invalid to-one declaration should have used, for the
/// error message.
fn expected_union(name: &str, target_decl: &ModelDecl) -> String {
    let key_ty = target_decl
        .field_decl(&target_decl.primary_key)
        .map(|pk| match &pk.ty {
            DeclTy::Scalar(ty) => format!("{ty:?}"),
            _ => "?".to_string(),
        })
        .unwrap_or_else(|| "?".to_string());
    format!("{name} | {key_ty}")
}

/// Identifiers end up in table names, column names, and column-alias path
/// segments; restricting them keeps the alias grammar injective and the
/// generated SQL quotable.
fn verify_ident(name: &str, what: &str) -> Result<()> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if ok {
        Ok(())
    } else {
        Err(Error::invalid_schema(format!(
            "{what} `{name}` may only contain ascii alphanumerics and `_`"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stmt::Type;

    fn post_decl() -> ModelDecl {
        ModelDecl::new("post")
            .table_name("posts")
            .field(FieldDecl::new("id", DeclTy::Scalar(Type::Uuid)))
            .field(FieldDecl::new("author", DeclTy::union("user", Type::Uuid)))
    }

    fn user_decl() -> ModelDecl {
        ModelDecl::new("user")
            .table_name("users")
            .field(FieldDecl::new("id", DeclTy::Scalar(Type::Uuid)))
            .field(FieldDecl::new("posts", DeclTy::many("post")).nullable())
            .back_reference("posts", "author")
    }

    #[test]
    fn one_to_many_resolves_in_either_order() {
        for decls in [
            vec![user_decl(), post_decl()],
            vec![post_decl(), user_decl()],
        ] {
            let mut builder = Builder::default();
            for decl in decls {
                builder.model(decl);
            }
            let schema = builder.build(&Capability::SQLITE).unwrap();

            let user = schema.app.model_by_name("user").unwrap();
            let posts = user.field_by_name("posts").unwrap();
            let has_many = posts.ty.as_has_many().expect("one-to-many");
            assert_eq!(
                schema.app.field(has_many.pair).name,
                "author",
                "pair is the far-side foreign key"
            );

            let post = schema.app.model_by_name("post").unwrap();
            let author = post.field_by_name("author").unwrap();
            let belongs_to = author.ty.as_belongs_to().expect("to-one");
            assert_eq!(belongs_to.pair, Some(posts.id));
            assert!(schema.app.join_tables.is_empty());
        }
    }

    #[test]
    fn many_to_many_synthesizes_one_join_table() {
        let student = || {
            ModelDecl::new("student")
                .table_name("students")
                .field(FieldDecl::new("id", DeclTy::Scalar(Type::Uuid)))
                .field(FieldDecl::new("courses", DeclTy::many("course")).nullable())
                .back_reference("courses", "students")
        };
        let course = || {
            ModelDecl::new("course")
                .table_name("courses")
                .field(FieldDecl::new("id", DeclTy::Scalar(Type::Uuid)))
                .field(FieldDecl::new("students", DeclTy::many("student")).nullable())
                .back_reference("students", "courses")
        };

        for decls in [vec![student(), course()], vec![course(), student()]] {
            let mut builder = Builder::default();
            for decl in decls {
                builder.model(decl);
            }
            let schema = builder.build(&Capability::SQLITE).unwrap();

            assert_eq!(schema.app.join_tables.len(), 1);
            let join_table = &schema.app.join_tables[0];
            assert_eq!(join_table.name, "courses_students__students_courses");
            assert_eq!(join_table.lhs.column, "courses");
            assert_eq!(join_table.rhs.column, "students");

            // Reachable from both sides, with opposite column ownership.
            let student = schema.app.model_by_name("student").unwrap();
            let courses = student.field_by_name("courses").unwrap();
            let rel = courses.ty.as_many_to_many().unwrap();
            assert_eq!(rel.owning_column(&schema.app), "students");
            assert_eq!(rel.partner_column(&schema.app), "courses");

            let course = schema.app.model_by_name("course").unwrap();
            let students = course.field_by_name("students").unwrap();
            let rel = students.ty.as_many_to_many().unwrap();
            assert_eq!(rel.join_table, join_table.id);
            assert_eq!(rel.owning_column(&schema.app), "courses");
            assert_eq!(rel.partner_column(&schema.app), "students");
        }
    }

    #[test]
    fn self_referential_many_to_many() {
        let mut builder = Builder::default();
        builder.model(
            ModelDecl::new("person")
                .table_name("people")
                .field(FieldDecl::new("id", DeclTy::Scalar(Type::Uuid)))
                .field(FieldDecl::new("siblings", DeclTy::many("person")).nullable())
                .back_reference("siblings", "siblings"),
        );
        let schema = builder.build(&Capability::SQLITE).unwrap();

        assert_eq!(schema.app.join_tables.len(), 1);
        let join_table = &schema.app.join_tables[0];
        assert_eq!(join_table.lhs.column, "people_a");
        assert_eq!(join_table.rhs.column, "people_b");

        let person = schema.app.model_by_name("person").unwrap();
        let siblings = person.field_by_name("siblings").unwrap();
        let rel = siblings.ty.as_many_to_many().unwrap();
        assert_eq!(rel.pair, siblings.id, "field pairs with itself");
        assert!(rel.owns_lhs);
    }

    #[test]
    fn missing_back_reference_is_rejected() {
        let mut builder = Builder::default();
        builder
            .model(
                ModelDecl::new("user")
                    .table_name("users")
                    .field(FieldDecl::new("id", DeclTy::Scalar(Type::Uuid)))
                    .field(FieldDecl::new("posts", DeclTy::many("post")).nullable()),
            )
            .model(post_decl());
        let err = builder.build(&Capability::SQLITE).unwrap_err();
        assert!(err.is_undefined_back_reference(), "err={err}");
    }

    #[test]
    fn mistyped_back_reference_is_rejected() {
        // `post.author` points at `account`, not `user`.
        let mut builder = Builder::default();
        builder
            .model(
                ModelDecl::new("account")
                    .table_name("accounts")
                    .field(FieldDecl::new("id", DeclTy::Scalar(Type::Uuid))),
            )
            .model(
                ModelDecl::new("user")
                    .table_name("users")
                    .field(FieldDecl::new("id", DeclTy::Scalar(Type::Uuid)))
                    .field(FieldDecl::new("posts", DeclTy::many("post")).nullable())
                    .back_reference("posts", "author"),
            )
            .model(
                ModelDecl::new("post")
                    .table_name("posts")
                    .field(FieldDecl::new("id", DeclTy::Scalar(Type::Uuid)))
                    .field(FieldDecl::new("author", DeclTy::union("account", Type::Uuid))),
            );
        let err = builder.build(&Capability::SQLITE).unwrap_err();
        assert!(err.is_mismatching_back_reference(), "err={err}");
    }

    #[test]
    fn bare_model_reference_must_union() {
        let mut builder = Builder::default();
        builder
            .model(user_decl())
            .model(
                ModelDecl::new("post")
                    .table_name("posts")
                    .field(FieldDecl::new("id", DeclTy::Scalar(Type::Uuid)))
                    .field(FieldDecl::new("author", DeclTy::Model("user".into()))),
            );
        let err = builder.build(&Capability::SQLITE).unwrap_err();
        assert!(err.is_must_union_foreign_key(), "err={err}");
        assert!(err.to_string().contains("user | Uuid"), "err={err}");
    }

    #[test]
    fn union_with_wrong_key_type_must_union() {
        let mut builder = Builder::default();
        builder
            .model(user_decl())
            .model(
                ModelDecl::new("post")
                    .table_name("posts")
                    .field(FieldDecl::new("id", DeclTy::Scalar(Type::Uuid)))
                    .field(FieldDecl::new("author", DeclTy::union("user", Type::I64))),
            );
        let err = builder.build(&Capability::SQLITE).unwrap_err();
        assert!(err.is_must_union_foreign_key(), "err={err}");
    }

    #[test]
    fn unregistered_reference_is_a_type_conversion_error() {
        let mut builder = Builder::default();
        builder.model(
            ModelDecl::new("post")
                .table_name("posts")
                .field(FieldDecl::new("id", DeclTy::Scalar(Type::Uuid)))
                .field(FieldDecl::new("author", DeclTy::Model("ghost".into()))),
        );
        let err = builder.build(&Capability::SQLITE).unwrap_err();
        assert!(err.is_type_conversion(), "err={err}");
    }

    #[test]
    fn scalar_list_is_a_json_column() {
        let mut builder = Builder::default();
        builder.model(
            ModelDecl::new("post")
                .table_name("posts")
                .field(FieldDecl::new("id", DeclTy::Scalar(Type::Uuid)))
                .field(FieldDecl::new(
                    "tags",
                    DeclTy::list(DeclTy::Scalar(Type::text())),
                )),
        );
        let schema = builder.build(&Capability::SQLITE).unwrap();
        let post = schema.app.model_by_name("post").unwrap();
        let tags = post.field_by_name("tags").unwrap();
        assert_eq!(
            tags.ty.expect_primitive().ty,
            Type::Json,
            "scalar collections are stored as JSON"
        );
    }
}
