//! Integration tests for PostgresDocumentStore
//!
//! These tests use a shared PostgreSQL container started once for the whole
//! test binary. Each test connects with a fresh pool and truncates the
//! documents table, and tests are serialized with `serial_test` since they
//! share that table.

use std::sync::Arc;

use doc_store::{
    Collection, DocStoreError, DocumentStore, DocumentStoreExt, PostgresDocumentStore, PutOptions,
    Revision,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use serial_test::serial;
use sqlx::postgres::PgPoolOptions;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

struct ContainerInfo {
    #[allow(dead_code)]
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();
            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();
            let connection_string = format!("postgres://postgres:postgres@{host}:{port}/postgres");

            // Apply the schema once for the whole binary
            let temp_pool = PgPoolOptions::new()
                .max_connections(1)
                .connect(&connection_string)
                .await
                .unwrap();
            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_documents_table.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

async fn setup_store() -> PostgresDocumentStore {
    let info = get_container().await;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();
    sqlx::query("TRUNCATE TABLE documents")
        .execute(&pool)
        .await
        .unwrap();
    PostgresDocumentStore::new(pool)
}

#[tokio::test]
#[serial]
async fn put_and_get_document() {
    let store = setup_store().await;

    let rev = store
        .put(
            Collection::Products,
            "p1",
            json!({ "name": "widget", "quantity": 5 }),
            PutOptions::new(),
        )
        .await
        .unwrap();
    assert_eq!(rev, Revision::first());

    let doc = store.get(Collection::Products, "p1").await.unwrap().unwrap();
    assert_eq!(doc.id, "p1");
    assert_eq!(doc.rev, Revision::first());
    assert_eq!(doc.body["name"], "widget");
    assert_eq!(doc.body["quantity"], 5);
}

#[tokio::test]
#[serial]
async fn get_missing_returns_none() {
    let store = setup_store().await;
    let doc = store.get(Collection::Products, "nope").await.unwrap();
    assert!(doc.is_none());
}

#[tokio::test]
#[serial]
async fn expect_new_fails_for_existing_document() {
    let store = setup_store().await;
    store
        .put(Collection::Users, "u1", json!({}), PutOptions::expect_new())
        .await
        .unwrap();

    let result = store
        .put(Collection::Users, "u1", json!({}), PutOptions::expect_new())
        .await;

    assert!(matches!(
        result,
        Err(DocStoreError::RevisionConflict { expected, actual, .. })
            if expected == Revision::initial() && actual == Revision::first()
    ));
}

#[tokio::test]
#[serial]
async fn stale_revision_is_rejected() {
    let store = setup_store().await;
    let rev1 = store
        .put(
            Collection::Products,
            "p1",
            json!({ "quantity": 10 }),
            PutOptions::new(),
        )
        .await
        .unwrap();

    store
        .put(
            Collection::Products,
            "p1",
            json!({ "quantity": 9 }),
            PutOptions::expect_rev(rev1),
        )
        .await
        .unwrap();

    let result = store
        .put(
            Collection::Products,
            "p1",
            json!({ "quantity": 8 }),
            PutOptions::expect_rev(rev1),
        )
        .await;

    assert!(matches!(
        result,
        Err(DocStoreError::RevisionConflict { expected, actual, .. })
            if expected == Revision::new(1) && actual == Revision::new(2)
    ));

    // The losing write must not have changed the document
    let doc = store.get(Collection::Products, "p1").await.unwrap().unwrap();
    assert_eq!(doc.body["quantity"], 9);
    assert_eq!(doc.rev, Revision::new(2));
}

#[tokio::test]
#[serial]
async fn matching_revision_bumps_by_one() {
    let store = setup_store().await;
    let rev1 = store
        .put(Collection::Products, "p1", json!({}), PutOptions::new())
        .await
        .unwrap();

    let rev2 = store
        .put(
            Collection::Products,
            "p1",
            json!({}),
            PutOptions::expect_rev(rev1),
        )
        .await
        .unwrap();

    assert_eq!(rev2, rev1.next());
}

#[tokio::test]
#[serial]
async fn unconditional_put_replaces_body() {
    let store = setup_store().await;
    store
        .put(
            Collection::Products,
            "p1",
            json!({ "name": "old", "color": "red" }),
            PutOptions::new(),
        )
        .await
        .unwrap();

    store
        .put(
            Collection::Products,
            "p1",
            json!({ "name": "new" }),
            PutOptions::new(),
        )
        .await
        .unwrap();

    let doc = store.get(Collection::Products, "p1").await.unwrap().unwrap();
    assert_eq!(doc.body["name"], "new");
    // Replaced wholesale, not merged
    assert!(doc.body.get("color").is_none());
}

#[tokio::test]
#[serial]
async fn find_by_ids_returns_found_subset() {
    let store = setup_store().await;
    for id in ["a", "b", "c"] {
        store
            .put(Collection::Products, id, json!({ "id": id }), PutOptions::new())
            .await
            .unwrap();
    }

    let ids = vec!["c".to_string(), "missing".to_string(), "a".to_string()];
    let found = store.find_by_ids(Collection::Products, &ids).await.unwrap();

    let found_ids: Vec<&str> = found.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(found_ids, vec!["a", "c"]);
}

#[tokio::test]
#[serial]
async fn find_by_field_matches_email() {
    let store = setup_store().await;
    store
        .put(
            Collection::Users,
            "u1",
            json!({ "email": "a@example.com" }),
            PutOptions::new(),
        )
        .await
        .unwrap();
    store
        .put(
            Collection::Users,
            "u2",
            json!({ "email": "b@example.com" }),
            PutOptions::new(),
        )
        .await
        .unwrap();

    let found = store
        .find_by_field(Collection::Users, "email", "b@example.com")
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "u2");
}

#[tokio::test]
#[serial]
async fn list_returns_collection_sorted_by_id() {
    let store = setup_store().await;
    for id in ["c", "a", "b"] {
        store
            .put(Collection::Orders, id, json!({}), PutOptions::new())
            .await
            .unwrap();
    }
    store
        .put(Collection::Products, "x", json!({}), PutOptions::new())
        .await
        .unwrap();

    let all = store.list(Collection::Orders).await.unwrap();
    let ids: Vec<&str> = all.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[tokio::test]
#[serial]
async fn delete_removes_document() {
    let store = setup_store().await;
    store
        .put(Collection::Sessions, "t1", json!({}), PutOptions::new())
        .await
        .unwrap();

    store.delete(Collection::Sessions, "t1").await.unwrap();
    assert!(store.get(Collection::Sessions, "t1").await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn delete_missing_returns_not_found() {
    let store = setup_store().await;
    let result = store.delete(Collection::Sessions, "nope").await;
    assert!(matches!(result, Err(DocStoreError::NotFound { .. })));
}

#[tokio::test]
#[serial]
async fn typed_roundtrip_through_ext_trait() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        quantity: i64,
    }

    let store = setup_store().await;
    let doc = Doc {
        name: "widget".to_string(),
        quantity: 3,
    };

    let rev = store
        .put_typed(Collection::Products, "p1", &doc, PutOptions::expect_new())
        .await
        .unwrap();
    assert_eq!(rev, Revision::first());

    let stored = store
        .get_typed::<Doc>(Collection::Products, "p1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.rev, Revision::first());
    assert_eq!(stored.doc, doc);
}

#[tokio::test]
#[serial]
async fn concurrent_revision_checked_writes_have_single_winner() {
    let store = setup_store().await;
    let rev1 = store
        .put(
            Collection::Products,
            "p1",
            json!({ "quantity": 1 }),
            PutOptions::new(),
        )
        .await
        .unwrap();

    let store_a = store.clone();
    let store_b = store.clone();
    let (a, b) = tokio::join!(
        store_a.put(
            Collection::Products,
            "p1",
            json!({ "quantity": 0, "writer": "a" }),
            PutOptions::expect_rev(rev1),
        ),
        store_b.put(
            Collection::Products,
            "p1",
            json!({ "quantity": 0, "writer": "b" }),
            PutOptions::expect_rev(rev1),
        ),
    );

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1);

    let loser = if a.is_ok() { b } else { a };
    assert!(matches!(
        loser,
        Err(DocStoreError::RevisionConflict { .. })
    ));

    let doc = store.get(Collection::Products, "p1").await.unwrap().unwrap();
    assert_eq!(doc.rev, Revision::new(2));
    assert_eq!(doc.body["quantity"], 0);
}
