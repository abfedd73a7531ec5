use chrono::{DateTime, Utc};
use shared::domain::{RecordId, UserRecord};

use crate::list::ListStore;

fn stamp(raw: &str) -> DateTime<Utc> {
    raw.parse().expect("timestamp")
}

fn user(id: &str, name: &str) -> UserRecord {
    UserRecord {
        id: RecordId::from(id),
        name: name.to_string(),
        email: format!("{}@x.com", name.to_lowercase()),
        created_at: stamp("2024-01-01T00:00:00Z"),
    }
}

fn ids(records: &[UserRecord]) -> Vec<&str> {
    records.iter().map(|record| record.id.as_str()).collect()
}

#[tokio::test]
async fn replace_swaps_the_whole_sequence() {
    let list = ListStore::new();
    list.replace(vec![user("u1", "Ada")]).await;
    list.replace(vec![user("u2", "Grace"), user("u3", "Linus")])
        .await;

    assert_eq!(ids(&list.snapshot().await), vec!["u2", "u3"]);
}

#[tokio::test]
async fn prepend_puts_the_new_record_first() {
    let list = ListStore::new();
    list.replace(vec![user("u1", "Ada")]).await;
    list.prepend(user("u2", "Grace")).await;

    assert_eq!(ids(&list.snapshot().await), vec!["u2", "u1"]);
}

#[tokio::test]
async fn prepend_keeps_ids_unique() {
    let list = ListStore::new();
    list.replace(vec![user("u1", "Ada"), user("u2", "Grace")])
        .await;
    list.prepend(user("u2", "Grace Revised")).await;

    let snapshot = list.snapshot().await;
    assert_eq!(ids(&snapshot), vec!["u2", "u1"]);
    assert_eq!(snapshot[0].name, "Grace Revised");
}

#[tokio::test]
async fn remove_deletes_exactly_one_and_preserves_order() {
    let list = ListStore::new();
    list.replace(vec![user("u1", "Ada"), user("u2", "Grace"), user("u3", "Linus")])
        .await;

    assert!(list.remove(&RecordId::from("u2")).await);
    assert_eq!(ids(&list.snapshot().await), vec!["u1", "u3"]);

    assert!(!list.remove(&RecordId::from("u9")).await);
    assert_eq!(list.len().await, 2);
}

#[tokio::test]
async fn snapshot_is_unaffected_by_later_mutations() {
    let list = ListStore::new();
    list.replace(vec![user("u1", "Ada"), user("u2", "Grace")])
        .await;

    let before = list.snapshot().await;
    list.remove(&RecordId::from("u1")).await;

    assert_eq!(before.len(), 2);
    assert_eq!(list.len().await, 1);
}
