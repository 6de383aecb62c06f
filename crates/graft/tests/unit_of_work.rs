mod support;

use support::{encode_many, decode_many, HasId, Link, Recording};

use graft::stmt::{Type, ValueRecord};
use graft::{Db, DeclTy, FieldDecl, Model, ModelDecl, Result};

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
struct Author {
    id: Uuid,
    name: String,
    books: Vec<Book>,
}

impl Model for Author {
    const NAME: &'static str = "author";

    fn schema() -> ModelDecl {
        ModelDecl::new("author")
            .table_name("authors")
            .field(FieldDecl::new("id", DeclTy::Scalar(Type::Uuid)))
            .field(FieldDecl::new("name", DeclTy::Scalar(Type::text())))
            .field(FieldDecl::new("books", DeclTy::many("book")).nullable())
            .back_reference("books", "author")
    }

    fn to_row(&self) -> ValueRecord {
        ValueRecord::from_vec(vec![
            self.id.into(),
            self.name.as_str().into(),
            encode_many(&self.books),
        ])
    }

    fn load(row: ValueRecord) -> Result<Self> {
        let mut fields = row.into_iter();
        Ok(Self {
            id: fields.next().unwrap().to_uuid()?,
            name: fields.next().unwrap().to_string()?,
            books: decode_many(fields.next().unwrap())?,
        })
    }
}

impl HasId for Author {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Book {
    id: Uuid,
    title: String,
    author: Link<Author>,
}

impl Model for Book {
    const NAME: &'static str = "book";

    fn schema() -> ModelDecl {
        ModelDecl::new("book")
            .table_name("books")
            .field(FieldDecl::new("id", DeclTy::Scalar(Type::Uuid)))
            .field(FieldDecl::new("title", DeclTy::Scalar(Type::text())))
            .field(FieldDecl::new("author", DeclTy::union("author", Type::Uuid)))
            .unique("title")
    }

    fn to_row(&self) -> ValueRecord {
        ValueRecord::from_vec(vec![
            self.id.into(),
            self.title.as_str().into(),
            self.author.encode(),
        ])
    }

    fn load(row: ValueRecord) -> Result<Self> {
        let mut fields = row.into_iter();
        Ok(Self {
            id: fields.next().unwrap().to_uuid()?,
            title: fields.next().unwrap().to_string()?,
            author: Link::decode(fields.next().unwrap())?,
        })
    }
}

impl HasId for Book {
    fn id(&self) -> Uuid {
        self.id
    }
}

async fn connect() -> (Db, support::StatementLog) {
    let driver = Recording::in_memory();
    let log = driver.log();
    let mut builder = Db::builder();
    builder.model::<Author>().model::<Book>();
    let db = builder.connect(driver).await.unwrap();
    (db, log)
}

fn author(name: &str) -> Author {
    Author {
        id: Uuid::new_v4(),
        name: name.to_string(),
        books: vec![],
    }
}

#[tokio::test]
async fn mid_plan_failure_rolls_back_the_whole_operation() {
    let (db, _log) = connect().await;
    let authors = db.collection::<Author>().unwrap();

    let mut first = author("first");
    first.books = vec![Book {
        id: Uuid::new_v4(),
        title: "dup".to_string(),
        author: Link::Key(first.id),
    }];
    authors.insert(&first).await.unwrap();

    // The second author's row is written before its book hits the unique
    // title constraint; the unit of work must roll both back.
    let mut second = author("second");
    second.books = vec![Book {
        id: Uuid::new_v4(),
        title: "dup".to_string(),
        author: Link::Key(second.id),
    }];
    let err = authors.insert(&second).await.unwrap_err();
    assert!(err.is_driver_operation_failed(), "err={err}");

    assert!(authors.find_one(second.id, 0).await.unwrap().is_none());
}

#[tokio::test]
async fn each_operation_is_one_unit_of_work() {
    let (db, log) = connect().await;
    let authors = db.collection::<Author>().unwrap();

    log.clear();
    let a = author("ada");
    authors.insert(&a).await.unwrap();

    let statements = log.statements();
    assert_eq!(statements.first().map(String::as_str), Some("BEGIN;"));
    assert_eq!(statements.last().map(String::as_str), Some("COMMIT;"));
    assert_eq!(statements.len(), 3, "statements={statements:?}");

    // A depth-0 find is a single statement inside its unit of work.
    log.clear();
    authors.find_one(a.id, 0).await.unwrap();
    let statements = log.statements();
    assert_eq!(statements.len(), 3, "statements={statements:?}");
    assert!(statements[1].starts_with("SELECT"), "statements={statements:?}");
}

#[tokio::test]
async fn failed_operation_emits_rollback() {
    let (db, log) = connect().await;
    let authors = db.collection::<Author>().unwrap();

    let a = author("ada");
    authors.insert(&a).await.unwrap();

    log.clear();
    // Same key again: the plain insert hits the primary key constraint.
    let err = authors.insert(&a).await.unwrap_err();
    assert!(err.is_driver_operation_failed(), "err={err}");

    let statements = log.statements();
    assert_eq!(statements.last().map(String::as_str), Some("ROLLBACK;"));
}
