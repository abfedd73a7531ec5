//! In-process table store emulating the hosted service: server-assigned ids
//! and timestamps, unique-column enforcement, eq/gte filters and ordering.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use shared::error::{StoreError, StoreResult, UNIQUE_VIOLATION};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{field_as_string, value_as_string, Filter, Order, TableStore};

pub struct MemoryTableStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    unique_columns: HashMap<String, Vec<String>>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            unique_columns: HashMap::new(),
        }
    }

    /// Declare a unique constraint; violating inserts fail with the same
    /// code the hosted store reports (`23505`).
    pub fn with_unique_column(
        mut self,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        self.unique_columns
            .entry(table.into())
            .or_default()
            .push(column.into());
        self
    }
}

impl Default for MemoryTableStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<Order>,
    ) -> StoreResult<Vec<Value>> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<Value> = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| filters.iter().all(|filter| filter.matches(row)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = order {
            rows.sort_by(|a, b| {
                let ordering =
                    field_as_string(a, &order.column).cmp(&field_as_string(b, &order.column));
                if order.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> StoreResult<Value> {
        let Value::Object(mut object) = row else {
            return Err(StoreError::message(format!(
                "row payload for {table} must be a JSON object"
            )));
        };

        let mut tables = self.tables.lock().await;
        let rows = tables.entry(table.to_string()).or_default();

        if let Some(columns) = self.unique_columns.get(table) {
            for column in columns {
                let Some(candidate) = object.get(column).map(value_as_string) else {
                    continue;
                };
                let duplicate = rows
                    .iter()
                    .any(|existing| field_as_string(existing, column) == Some(candidate.clone()));
                if duplicate {
                    return Err(StoreError::with_code(
                        UNIQUE_VIOLATION,
                        format!(
                            "duplicate key value violates unique constraint \"{table}_{column}_key\""
                        ),
                    ));
                }
            }
        }

        object
            .entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        object.entry("created_at").or_insert_with(|| {
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
        });

        let stored = Value::Object(object);
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> StoreResult<()> {
        if filters.is_empty() {
            return Err(StoreError::message(format!(
                "refusing to delete from {table} without a filter"
            )));
        }
        let mut tables = self.tables.lock().await;
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|row| !filters.iter().all(|filter| filter.matches(row)));
        }
        Ok(())
    }

    async fn count(&self, table: &str, filters: &[Filter]) -> StoreResult<u64> {
        let tables = self.tables.lock().await;
        let total = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| filters.iter().all(|filter| filter.matches(row)))
                    .count()
            })
            .unwrap_or(0);
        Ok(total as u64)
    }
}
