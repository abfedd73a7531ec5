//! Client contract for the hosted table store, plus the concrete backends:
//! a REST client speaking a PostgREST-style dialect and an in-process
//! emulation for tests and offline demos.

use async_trait::async_trait;
use serde_json::Value;
use shared::error::{StoreError, StoreResult};

pub mod memory;
pub mod rest;

pub use memory::MemoryTableStore;
pub use rest::RestTableStore;

#[cfg(test)]
mod tests;

/// Row filter in the store's own dialect. Values are wire strings; `gte`
/// over RFC 3339 timestamps relies on their lexicographic ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Eq { column: String, value: String },
    Gte { column: String, value: String },
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Eq {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn gte(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Gte {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn to_query_pair(&self) -> (String, String) {
        match self {
            Filter::Eq { column, value } => (column.clone(), format!("eq.{value}")),
            Filter::Gte { column, value } => (column.clone(), format!("gte.{value}")),
        }
    }

    pub fn matches(&self, row: &Value) -> bool {
        match self {
            Filter::Eq { column, value } => {
                field_as_string(row, column).is_some_and(|field| field == *value)
            }
            Filter::Gte { column, value } => {
                field_as_string(row, column).is_some_and(|field| field.as_str() >= value.as_str())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub descending: bool,
}

impl Order {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }

    pub fn created_at_desc() -> Self {
        Self::desc("created_at")
    }

    pub fn to_query_value(&self) -> String {
        let direction = if self.descending { "desc" } else { "asc" };
        format!("{}.{direction}", self.column)
    }
}

/// The hosted table-store collaborator. All operations report failure via
/// `StoreError`; an `Ok` is the only success signal. Typed decoding of rows
/// is the caller's concern.
#[async_trait]
pub trait TableStore: Send + Sync {
    async fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<Order>,
    ) -> StoreResult<Vec<Value>>;

    async fn insert(&self, table: &str, row: Value) -> StoreResult<Value>;

    async fn delete(&self, table: &str, filters: &[Filter]) -> StoreResult<()>;

    async fn count(&self, table: &str, filters: &[Filter]) -> StoreResult<u64>;
}

/// Placeholder used when no backend has been wired up.
pub struct MissingTableStore;

impl MissingTableStore {
    fn unavailable(table: &str) -> StoreError {
        StoreError::message(format!("table store backend unavailable for table {table}"))
    }
}

#[async_trait]
impl TableStore for MissingTableStore {
    async fn select(
        &self,
        table: &str,
        _filters: &[Filter],
        _order: Option<Order>,
    ) -> StoreResult<Vec<Value>> {
        Err(Self::unavailable(table))
    }

    async fn insert(&self, table: &str, _row: Value) -> StoreResult<Value> {
        Err(Self::unavailable(table))
    }

    async fn delete(&self, table: &str, _filters: &[Filter]) -> StoreResult<()> {
        Err(Self::unavailable(table))
    }

    async fn count(&self, table: &str, _filters: &[Filter]) -> StoreResult<u64> {
        Err(Self::unavailable(table))
    }
}

pub(crate) fn field_as_string(row: &Value, column: &str) -> Option<String> {
    row.get(column).map(value_as_string)
}

pub(crate) fn value_as_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
