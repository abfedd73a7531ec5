use serde_json::json;

use crate::{Filter, MemoryTableStore, Order, TableStore};

#[tokio::test]
async fn insert_assigns_id_and_created_at() {
    let store = MemoryTableStore::new();
    let row = store
        .insert("notes", json!({"title": "Groceries", "content": "", "user_id": "demo-user-1"}))
        .await
        .expect("insert");

    assert!(row["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(row["created_at"]
        .as_str()
        .is_some_and(|stamp| stamp.ends_with('Z')));
    assert_eq!(row["title"], "Groceries");
}

#[tokio::test]
async fn insert_keeps_caller_supplied_id_and_timestamp() {
    let store = MemoryTableStore::new();
    let row = store
        .insert(
            "notes",
            json!({"id": "n1", "title": "Fixed", "created_at": "2024-01-01T00:00:00.000000Z"}),
        )
        .await
        .expect("insert");

    assert_eq!(row["id"], "n1");
    assert_eq!(row["created_at"], "2024-01-01T00:00:00.000000Z");
}

#[tokio::test]
async fn duplicate_unique_column_fails_with_conflict_code() {
    let store = MemoryTableStore::new().with_unique_column("users", "email");
    store
        .insert("users", json!({"name": "Ada", "email": "ada@x.com"}))
        .await
        .expect("first insert");

    let err = store
        .insert("users", json!({"name": "Other Ada", "email": "ada@x.com"}))
        .await
        .expect_err("duplicate must fail");
    assert!(err.is_unique_violation());

    store
        .insert("users", json!({"name": "Grace", "email": "grace@x.com"}))
        .await
        .expect("distinct email still inserts");
}

#[tokio::test]
async fn select_applies_scope_filter_and_descending_order() {
    let store = MemoryTableStore::new();
    for (id, user, stamp) in [
        ("n1", "demo-user-1", "2024-01-01T00:00:00.000000Z"),
        ("n2", "demo-user-2", "2024-01-02T00:00:00.000000Z"),
        ("n3", "demo-user-1", "2024-01-03T00:00:00.000000Z"),
    ] {
        store
            .insert(
                "notes",
                json!({"id": id, "title": id, "user_id": user, "created_at": stamp}),
            )
            .await
            .expect("seed");
    }

    let rows = store
        .select(
            "notes",
            &[Filter::eq("user_id", "demo-user-1")],
            Some(Order::created_at_desc()),
        )
        .await
        .expect("select");

    let ids: Vec<&str> = rows.iter().filter_map(|row| row["id"].as_str()).collect();
    assert_eq!(ids, vec!["n3", "n1"]);
}

#[tokio::test]
async fn gte_filter_selects_recent_rows() {
    let store = MemoryTableStore::new();
    for (id, stamp) in [
        ("old", "2024-01-01T00:00:00.000000Z"),
        ("recent", "2024-06-01T00:00:00.000000Z"),
    ] {
        store
            .insert("notes", json!({"id": id, "created_at": stamp}))
            .await
            .expect("seed");
    }

    let count = store
        .count(
            "notes",
            &[Filter::gte("created_at", "2024-05-01T00:00:00.000000Z")],
        )
        .await
        .expect("count");
    assert_eq!(count, 1);
}

#[tokio::test]
async fn delete_removes_only_matching_rows() {
    let store = MemoryTableStore::new();
    for id in ["n1", "n2", "n3"] {
        store
            .insert("notes", json!({"id": id, "title": id}))
            .await
            .expect("seed");
    }

    store
        .delete("notes", &[Filter::eq("id", "n2")])
        .await
        .expect("delete");

    let rows = store.select("notes", &[], None).await.expect("select");
    let ids: Vec<&str> = rows.iter().filter_map(|row| row["id"].as_str()).collect();
    assert_eq!(ids, vec!["n1", "n3"]);
}

#[tokio::test]
async fn unfiltered_delete_is_refused() {
    let store = MemoryTableStore::new();
    store
        .insert("notes", json!({"id": "n1"}))
        .await
        .expect("seed");

    let err = store.delete("notes", &[]).await.expect_err("must refuse");
    assert!(err.message.contains("without a filter"));
    assert_eq!(store.count("notes", &[]).await.expect("count"), 1);
}
