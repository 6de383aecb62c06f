use crate::stmt;

use indexmap::IndexMap;

/// A declared model, before resolution.
///
/// Declarations are plain data owned by the caller and handed to
/// [`crate::schema::Builder`]; registering one has no side effects until the
/// builder resolves the whole set.
#[derive(Debug, Clone)]
pub struct ModelDecl {
    /// Logical model name
    pub name: String,

    /// Name of the table the model maps to
    pub table_name: String,

    /// Field declarations, in order
    pub fields: Vec<FieldDecl>,

    /// Name of the primary-key field
    pub primary_key: String,

    /// Fields to index
    pub indexed: Vec<String>,

    /// Fields with a single-column uniqueness constraint
    pub unique: Vec<String>,

    /// Multi-field uniqueness constraints
    pub unique_together: Vec<Vec<String>>,

    /// To-many field name -> field name on the far side that refers back
    pub back_references: IndexMap<String, String>,
}

impl ModelDecl {
    /// Create a declaration named `name`, mapping to a table of the same
    /// name. The primary key defaults to `id`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            table_name: name.clone(),
            name,
            fields: vec![],
            primary_key: "id".to_string(),
            indexed: vec![],
            unique: vec![],
            unique_together: vec![],
            back_references: IndexMap::new(),
        }
    }

    pub fn table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn primary_key(mut self, field: impl Into<String>) -> Self {
        self.primary_key = field.into();
        self
    }

    pub fn index(mut self, field: impl Into<String>) -> Self {
        self.indexed.push(field.into());
        self
    }

    pub fn unique(mut self, field: impl Into<String>) -> Self {
        self.unique.push(field.into());
        self
    }

    pub fn unique_together<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unique_together
            .push(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Declare that the to-many `field` is referred back to by `far_field`
    /// on the target model.
    pub fn back_reference(
        mut self,
        field: impl Into<String>,
        far_field: impl Into<String>,
    ) -> Self {
        self.back_references.insert(field.into(), far_field.into());
        self
    }

    pub fn field_decl(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// A declared field, before resolution.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    /// The field name; column fields store under this exact name.
    pub name: String,

    /// The declared type
    pub ty: DeclTy,

    /// True if the field may hold no value
    pub nullable: bool,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: DeclTy) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// The declared type of a field. Relation kinds are derived from these
/// shapes during resolution, never re-derived afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclTy {
    /// A plain scalar or structured column
    Scalar(stmt::Type),

    /// A bare reference to a declared model. Not storable: to-one fields
    /// must use [`DeclTy::Union`] so a caller can pass either a nested
    /// record or a bare key.
    Model(String),

    /// The to-one form `Related | KeyType`. The key type must equal the
    /// target model's primary-key type.
    Union(String, stmt::Type),

    /// A collection. A collection of a declared model is a to-many
    /// relation (back reference required); any other element type is
    /// stored as a JSON column.
    List(Box<DeclTy>),
}

impl DeclTy {
    pub fn scalar(ty: stmt::Type) -> Self {
        Self::Scalar(ty)
    }

    /// The to-one union form: `model | key_ty`.
    pub fn union(model: impl Into<String>, key_ty: stmt::Type) -> Self {
        Self::Union(model.into(), key_ty)
    }

    /// A collection of the given element type.
    pub fn list(elem: DeclTy) -> Self {
        Self::List(Box::new(elem))
    }

    /// A to-many relation: a collection of the named model.
    pub fn many(model: impl Into<String>) -> Self {
        Self::List(Box::new(Self::Model(model.into())))
    }
}
