mod support;

use support::{HasId, Link};

use graft::stmt::{Type, ValueRecord};
use graft::{Db, DeclTy, FieldDecl, Model, ModelDecl, Result};

use graft_driver_sqlite::Sqlite;

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
struct User {
    id: Uuid,
    name: String,
}

impl Model for User {
    const NAME: &'static str = "user";

    fn schema() -> ModelDecl {
        ModelDecl::new("user")
            .table_name("users")
            .field(FieldDecl::new("id", DeclTy::Scalar(Type::Uuid)))
            .field(FieldDecl::new("name", DeclTy::Scalar(Type::text())))
    }

    fn to_row(&self) -> ValueRecord {
        ValueRecord::from_vec(vec![self.id.into(), self.name.as_str().into()])
    }

    fn load(row: ValueRecord) -> Result<Self> {
        let mut fields = row.into_iter();
        Ok(Self {
            id: fields.next().unwrap().to_uuid()?,
            name: fields.next().unwrap().to_string()?,
        })
    }
}

impl HasId for User {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Post {
    id: Uuid,
    title: String,
    author: Link<User>,
}

impl Model for Post {
    const NAME: &'static str = "post";

    fn schema() -> ModelDecl {
        ModelDecl::new("post")
            .table_name("posts")
            .field(FieldDecl::new("id", DeclTy::Scalar(Type::Uuid)))
            .field(FieldDecl::new("title", DeclTy::Scalar(Type::text())))
            .field(FieldDecl::new("author", DeclTy::union("user", Type::Uuid)))
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

impl HasId for Post {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Comment {
    id: Uuid,
    body: String,
    post: Link<Post>,
}

impl Model for Comment {
    const NAME: &'static str = "comment";

    fn schema() -> ModelDecl {
        ModelDecl::new("comment")
            .table_name("comments")
            .field(FieldDecl::new("id", DeclTy::Scalar(Type::Uuid)))
            .field(FieldDecl::new("body", DeclTy::Scalar(Type::text())))
            .field(FieldDecl::new("post", DeclTy::union("post", Type::Uuid)))
    }

    fn to_row(&self) -> ValueRecord {
        ValueRecord::from_vec(vec![
            self.id.into(),
            self.body.as_str().into(),
            self.post.encode(),
        ])
    }

    fn load(row: ValueRecord) -> Result<Self> {
        let mut fields = row.into_iter();
        Ok(Self {
            id: fields.next().unwrap().to_uuid()?,
            body: fields.next().unwrap().to_string()?,
            post: Link::decode(fields.next().unwrap())?,
        })
    }
}

/// A self-referential to-one relation.
#[derive(Debug, Clone, PartialEq)]
struct Employee {
    id: Uuid,
    name: String,
    manager: Option<Link<Employee>>,
}

impl Model for Employee {
    const NAME: &'static str = "employee";

    fn schema() -> ModelDecl {
        ModelDecl::new("employee")
            .table_name("employees")
            .field(FieldDecl::new("id", DeclTy::Scalar(Type::Uuid)))
            .field(FieldDecl::new("name", DeclTy::Scalar(Type::text())))
            .field(FieldDecl::new("manager", DeclTy::union("employee", Type::Uuid)).nullable())
    }

    fn to_row(&self) -> ValueRecord {
        ValueRecord::from_vec(vec![
            self.id.into(),
            self.name.as_str().into(),
            Link::encode_opt(&self.manager),
        ])
    }

    fn load(row: ValueRecord) -> Result<Self> {
        let mut fields = row.into_iter();
        Ok(Self {
            id: fields.next().unwrap().to_uuid()?,
            name: fields.next().unwrap().to_string()?,
            manager: Link::decode_opt(fields.next().unwrap())?,
        })
    }
}

impl HasId for Employee {
    fn id(&self) -> Uuid {
        self.id
    }
}

async fn connect() -> Db {
    let mut builder = Db::builder();
    builder
        .model::<User>()
        .model::<Post>()
        .model::<Comment>()
        .model::<Employee>();
    builder.connect(Sqlite::in_memory()).await.unwrap()
}

fn user(name: &str) -> User {
    User {
        id: Uuid::new_v4(),
        name: name.to_string(),
    }
}

#[tokio::test]
async fn insert_with_full_relation_upserts_the_target() {
    let db = connect().await;

    let ada = user("ada");
    let post = Post {
        id: Uuid::new_v4(),
        title: "hello".to_string(),
        author: Link::full(ada.clone()),
    };
    db.collection::<Post>().unwrap().insert(&post).await.unwrap();

    // The related row was written by the pre-pass.
    let found = db
        .collection::<User>()
        .unwrap()
        .find_one(ada.id, 0)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, ada);
}

#[tokio::test]
async fn insert_with_bare_key_links_only() {
    let db = connect().await;

    let ada = user("ada");
    db.collection::<User>().unwrap().insert(&ada).await.unwrap();

    let post = Post {
        id: Uuid::new_v4(),
        title: "hello".to_string(),
        author: Link::Key(ada.id),
    };
    db.collection::<Post>().unwrap().insert(&post).await.unwrap();

    let found = db
        .collection::<Post>()
        .unwrap()
        .find_one(post.id, 1)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.author, Link::full(ada));
}

#[tokio::test]
async fn depth_zero_leaves_bare_keys() {
    let db = connect().await;

    let ada = user("ada");
    let post = Post {
        id: Uuid::new_v4(),
        title: "hello".to_string(),
        author: Link::full(ada.clone()),
    };
    db.collection::<Post>().unwrap().insert(&post).await.unwrap();

    let found = db
        .collection::<Post>()
        .unwrap()
        .find_one(post.id, 0)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.author, Link::Key(ada.id));
}

#[tokio::test]
async fn depth_bounds_the_to_one_chain_exactly() {
    let db = connect().await;

    let ada = user("ada");
    let post = Post {
        id: Uuid::new_v4(),
        title: "hello".to_string(),
        author: Link::full(ada.clone()),
    };
    let comment = Comment {
        id: Uuid::new_v4(),
        body: "nice".to_string(),
        post: Link::full(post.clone()),
    };
    db.collection::<Comment>()
        .unwrap()
        .insert(&comment)
        .await
        .unwrap();

    // depth 1: the post is populated, but its author stays a bare key —
    // not null and not an object.
    let at_one = db
        .collection::<Comment>()
        .unwrap()
        .find_one(comment.id, 1)
        .await
        .unwrap()
        .unwrap();
    let Link::Full(found_post) = &at_one.post else {
        panic!("post not populated at depth 1");
    };
    assert_eq!(found_post.author, Link::Key(ada.id));

    // depth 2: the chain is populated two levels deep.
    let at_two = db
        .collection::<Comment>()
        .unwrap()
        .find_one(comment.id, 2)
        .await
        .unwrap()
        .unwrap();
    let Link::Full(found_post) = &at_two.post else {
        panic!("post not populated at depth 2");
    };
    assert_eq!(found_post.author, Link::full(ada));
}

#[tokio::test]
async fn nullable_relation_stays_none() {
    let db = connect().await;
    let employees = db.collection::<Employee>().unwrap();

    let solo = Employee {
        id: Uuid::new_v4(),
        name: "solo".to_string(),
        manager: None,
    };
    employees.insert(&solo).await.unwrap();

    let found = employees.find_one(solo.id, 2).await.unwrap().unwrap();
    assert_eq!(found.manager, None);
}

#[tokio::test]
async fn self_referential_chain_respects_depth() {
    let db = connect().await;
    let employees = db.collection::<Employee>().unwrap();

    let root = Employee {
        id: Uuid::new_v4(),
        name: "root".to_string(),
        manager: None,
    };
    let mid = Employee {
        id: Uuid::new_v4(),
        name: "mid".to_string(),
        manager: Some(Link::full(root.clone())),
    };
    let leaf = Employee {
        id: Uuid::new_v4(),
        name: "leaf".to_string(),
        manager: Some(Link::full(mid.clone())),
    };
    employees.insert(&leaf).await.unwrap();

    let found = employees.find_one(leaf.id, 2).await.unwrap().unwrap();
    let Some(Link::Full(found_mid)) = &found.manager else {
        panic!("manager not populated");
    };
    assert_eq!(found_mid.manager, Some(Link::full(root)));

    let found = employees.find_one(leaf.id, 1).await.unwrap().unwrap();
    let Some(Link::Full(found_mid)) = &found.manager else {
        panic!("manager not populated");
    };
    assert_eq!(found_mid.manager, Some(Link::Key(mid.manager.unwrap().key())));
}
