//! Render-ready record sequence for one screen, swapped atomically.

use std::sync::Arc;

use shared::domain::{RecordId, TableRecord};
use tokio::sync::RwLock;

/// Ordered records, `created_at` descending, unique by id. Every mutation
/// builds a fresh vector and swaps the shared `Arc`, so a snapshot taken
/// before the swap is never partially mutated.
pub struct ListStore<R: TableRecord> {
    items: RwLock<Arc<Vec<R>>>,
}

impl<R: TableRecord> ListStore<R> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Arc::new(Vec::new())),
        }
    }

    pub async fn snapshot(&self) -> Arc<Vec<R>> {
        Arc::clone(&*self.items.read().await)
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Full refresh: the rows replace whatever was held before.
    pub async fn replace(&self, rows: Vec<R>) {
        *self.items.write().await = Arc::new(rows);
    }

    /// Insert the server-returned record at the head without a re-fetch.
    /// If server timestamp resolution ties, the head position may differ
    /// slightly from a full re-fetch until the next refresh. Ids stay
    /// unique even if the server echoes an already-present row.
    pub async fn prepend(&self, record: R) {
        let mut guard = self.items.write().await;
        let id = record.id().clone();
        let mut next = Vec::with_capacity(guard.len() + 1);
        next.push(record);
        next.extend(guard.iter().filter(|existing| *existing.id() != id).cloned());
        *guard = Arc::new(next);
    }

    /// Set-difference by id; relative order of the remaining records is
    /// preserved. Returns whether a record was removed.
    pub async fn remove(&self, id: &RecordId) -> bool {
        let mut guard = self.items.write().await;
        if !guard.iter().any(|record| record.id() == id) {
            return false;
        }
        let next: Vec<R> = guard
            .iter()
            .filter(|record| record.id() != id)
            .cloned()
            .collect();
        *guard = Arc::new(next);
        true
    }
}

impl<R: TableRecord> Default for ListStore<R> {
    fn default() -> Self {
        Self::new()
    }
}
