use graft::stmt::{Type, Value, ValueRecord};
use graft::{Db, DeclTy, Direction, FieldDecl, FindMany, Model, ModelDecl, Result};

use graft_driver_sqlite::Sqlite;

use pretty_assertions::assert_eq;

/// Scalar and structured columns only: pagination, upsert idempotence, and
/// the scalar round-trip property run against this model.
#[derive(Debug, Clone, PartialEq)]
struct Track {
    id: i64,
    title: String,
    plays: Option<i64>,
    rating: f64,
    explicit: bool,
    extra: serde_json::Value,
}

impl Model for Track {
    const NAME: &'static str = "track";

    fn schema() -> ModelDecl {
        ModelDecl::new("track")
            .table_name("tracks")
            .field(FieldDecl::new("id", DeclTy::Scalar(Type::I64)))
            .field(FieldDecl::new("title", DeclTy::Scalar(Type::varchar(120))))
            .field(FieldDecl::new("plays", DeclTy::Scalar(Type::I64)).nullable())
            .field(FieldDecl::new("rating", DeclTy::Scalar(Type::F64)))
            .field(FieldDecl::new("explicit", DeclTy::Scalar(Type::Bool)))
            .field(FieldDecl::new("extra", DeclTy::Scalar(Type::Json)))
            .index("title")
    }

    fn to_row(&self) -> ValueRecord {
        ValueRecord::from_vec(vec![
            self.id.into(),
            self.title.as_str().into(),
            Value::from_option(self.plays),
            self.rating.into(),
            self.explicit.into(),
            self.extra.clone().into(),
        ])
    }

    fn load(row: ValueRecord) -> Result<Self> {
        let mut fields = row.into_iter();
        let mut next = || fields.next().expect("field count");
        Ok(Self {
            id: next().to_i64()?,
            title: next().to_string()?,
            plays: match next() {
                Value::Null => None,
                value => Some(value.to_i64()?),
            },
            rating: next().to_f64()?,
            explicit: next().to_bool()?,
            extra: next().to_json()?,
        })
    }
}

fn track(id: i64, title: &str) -> Track {
    Track {
        id,
        title: title.to_string(),
        plays: Some(id * 10),
        rating: id as f64 + 0.5,
        explicit: id % 2 == 0,
        extra: serde_json::json!({ "tags": ["demo", title] }),
    }
}

async fn connect() -> Db {
    let mut builder = Db::builder();
    builder.model::<Track>();
    builder.connect(Sqlite::in_memory()).await.unwrap()
}

#[tokio::test]
async fn insert_then_find_one_round_trips() {
    let db = connect().await;
    let tracks = db.collection::<Track>().unwrap();

    let t1 = track(1, "intro");
    tracks.insert(&t1).await.unwrap();

    let found = tracks.find_one(1i64, 0).await.unwrap().unwrap();
    assert_eq!(found, t1);
}

#[tokio::test]
async fn find_one_missing_key_is_none() {
    let db = connect().await;
    let tracks = db.collection::<Track>().unwrap();

    assert_eq!(tracks.find_one(42i64, 0).await.unwrap(), None);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let db = connect().await;
    let tracks = db.collection::<Track>().unwrap();

    tracks.insert(&track(1, "intro")).await.unwrap();
    tracks.delete(1i64).await.unwrap();
    assert_eq!(tracks.find_one(1i64, 0).await.unwrap(), None);

    // Deleting a missing key is a no-op success.
    tracks.delete(1i64).await.unwrap();
}

#[tokio::test]
async fn update_rewrites_columns() {
    let db = connect().await;
    let tracks = db.collection::<Track>().unwrap();

    let mut t1 = track(1, "intro");
    tracks.insert(&t1).await.unwrap();

    t1.title = "outro".to_string();
    t1.plays = None;
    tracks.update(&t1).await.unwrap();

    let found = tracks.find_one(1i64, 0).await.unwrap().unwrap();
    assert_eq!(found, t1);
}

#[tokio::test]
async fn pagination_with_order() {
    let db = connect().await;
    let tracks = db.collection::<Track>().unwrap();

    let all: Vec<Track> = (1..=4).map(|i| track(i, "t")).collect();
    for t in &all {
        tracks.insert(t).await.unwrap();
    }

    let page = tracks
        .find_many(
            FindMany::new()
                .order_by("id", Direction::Asc)
                .limit(2)
                .offset(2),
        )
        .await
        .unwrap();

    assert_eq!(page.offset, 2);
    assert_eq!(page.limit, Some(2));
    assert_eq!(page.items, vec![all[2].clone(), all[3].clone()]);
}

#[tokio::test]
async fn find_many_equality_filter() {
    let db = connect().await;
    let tracks = db.collection::<Track>().unwrap();

    tracks.insert(&track(1, "same")).await.unwrap();
    tracks.insert(&track(2, "same")).await.unwrap();
    tracks.insert(&track(3, "other")).await.unwrap();

    let page = tracks
        .find_many(
            FindMany::new()
                .where_eq("title", "same")
                .order_by("id", Direction::Desc),
        )
        .await
        .unwrap();

    let ids: Vec<i64> = page.items.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
async fn unknown_filter_column_is_rejected() {
    let db = connect().await;
    let tracks = db.collection::<Track>().unwrap();

    let err = tracks
        .find_many(FindMany::new().where_eq("no_such_column", 1i64))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no_such_column"), "err={err}");
}

#[tokio::test]
async fn upsert_is_idempotent() {
    let db = connect().await;
    let tracks = db.collection::<Track>().unwrap();

    let mut t1 = track(1, "intro");
    tracks.upsert(&t1).await.unwrap();
    tracks.upsert(&t1).await.unwrap();

    let page = tracks.find_many(FindMany::new()).await.unwrap();
    assert_eq!(page.items.len(), 1, "exactly one row for the key");
    assert_eq!(page.items[0], t1);

    // Upsert of a changed instance updates in place.
    t1.title = "remaster".to_string();
    tracks.upsert(&t1).await.unwrap();
    let found = tracks.find_one(1i64, 0).await.unwrap().unwrap();
    assert_eq!(found, t1);
}
