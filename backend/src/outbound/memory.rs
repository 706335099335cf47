//! Process-local `RowStore` used when no database is configured and by tests.
//!
//! Rows live in one map guarded by a single `std::sync::Mutex`; the lock is
//! only held for the synchronous body of a call, never across an `.await`.
//! The store mimics the Postgres adapter closely enough for the data-access
//! conventions to be exercised:
//!
//! - unknown keys are dropped, missing fields become `null` or their declared
//!   default (random UUID, current time);
//! - identity and unique fields reject duplicate non-null values;
//! - equality never matches `null`, ascending order puts `null` last and
//!   descending order puts it first.
//!
//! Values are compared as JSON, so `"1"` and `1` are different values here
//! whereas Postgres would coerce them to the column type.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::SecondsFormat;
use mockable::Clock;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{Condition, OrderBy, RowKey, RowStore, RowStoreError, Select};
use crate::domain::{FieldDefault, Row, SortDirection, TableName, TableSchema};

type Tables = HashMap<TableName, Vec<Row>>;

/// In-memory implementation of the row store port.
pub struct InMemoryRowStore {
    tables: Mutex<Tables>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRowStore {
    /// Create an empty store stamping `Now` defaults from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, RowStoreError> {
        self.tables
            .lock()
            .map_err(|_| RowStoreError::connection("in-memory store lock poisoned"))
    }

    fn now(&self) -> Value {
        Value::String(self.clock.utc().to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    fn default_value(&self, default: Option<FieldDefault>) -> Value {
        match default {
            Some(FieldDefault::GeneratedUuid) => Value::String(Uuid::new_v4().to_string()),
            Some(FieldDefault::Now) => self.now(),
            None => Value::Null,
        }
    }

    /// Keep declared fields only and fill the missing ones.
    fn complete(&self, schema: &TableSchema, row: Row) -> Row {
        let mut projected = project(schema, row);
        for field in schema.fields() {
            if !projected.contains_key(field.name()) {
                projected.insert(field.name().to_owned(), self.default_value(field.default()));
            }
        }
        projected
    }

    fn insert_locked(
        &self,
        rows: &mut Vec<Row>,
        schema: &TableSchema,
        row: Row,
    ) -> Result<Row, RowStoreError> {
        let created = self.complete(schema, row);
        ensure_unique(schema, rows, &created, None)?;
        rows.push(created.clone());
        Ok(created)
    }
}

/// Drop keys that are not fields of `schema`.
fn project(schema: &TableSchema, row: Row) -> Row {
    row.into_iter()
        .filter(|(key, _)| {
            let known = schema.field(key).is_some();
            if !known {
                debug!(table = %schema.name(), field = key.as_str(), "ignoring unknown field");
            }
            known
        })
        .collect()
}

fn merge(target: &mut Row, changes: Row) {
    for (key, value) in changes {
        target.insert(key, value);
    }
}

fn ensure_unique(
    schema: &TableSchema,
    rows: &[Row],
    candidate: &Row,
    skip: Option<usize>,
) -> Result<(), RowStoreError> {
    let keyed = schema
        .fields()
        .iter()
        .filter(|field| field.is_unique() || field.name() == schema.identity_field());
    for field in keyed {
        let Some(value) = candidate.get(field.name()).filter(|value| !value.is_null()) else {
            continue;
        };
        let clash = rows
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != skip)
            .any(|(_, row)| row.get(field.name()) == Some(value));
        if clash {
            return Err(RowStoreError::constraint(format!(
                "duplicate value for {}.{}",
                schema.name(),
                field.name()
            )));
        }
    }
    Ok(())
}

fn matches(row: &Row, condition: &Condition) -> bool {
    match condition {
        Condition::Equals { field, value } => {
            !value.is_null() && row.get(*field).is_some_and(|stored| stored == value)
        }
        Condition::IsNull { field } => row.get(*field).is_none_or(Value::is_null),
    }
}

fn find_index(rows: &[Row], key: &RowKey) -> Option<usize> {
    let condition = Condition::Equals {
        field: key.field,
        value: key.value.clone(),
    };
    rows.iter().position(|row| matches(row, &condition))
}

/// Total order over JSON scalars with `null` sorting last.
fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => a.to_string().cmp(&b.to_string()),
        },
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (a, b) => a.to_string().cmp(&b.to_string()),
    }
}

fn order_rows(rows: &mut [Row], order: OrderBy) {
    rows.sort_by(|a, b| {
        let ascending = compare_values(
            a.get(order.field).unwrap_or(&Value::Null),
            b.get(order.field).unwrap_or(&Value::Null),
        );
        match order.direction {
            SortDirection::Asc => ascending,
            SortDirection::Desc => ascending.reverse(),
        }
    });
}

#[async_trait]
impl RowStore for InMemoryRowStore {
    async fn select(
        &self,
        table: &TableSchema,
        select: &Select,
    ) -> Result<Vec<Row>, RowStoreError> {
        let tables = self.lock()?;
        let mut rows: Vec<Row> = tables
            .get(&table.name())
            .map(|rows| {
                rows.iter()
                    .filter(|row| select.conditions.iter().all(|c| matches(row, c)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(tables);

        if let Some(order) = select.order {
            order_rows(&mut rows, order);
        }
        if let Some(limit) = select.limit {
            rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(rows)
    }

    async fn insert(&self, table: &TableSchema, row: Row) -> Result<Row, RowStoreError> {
        let mut tables = self.lock()?;
        let rows = tables.entry(table.name()).or_default();
        self.insert_locked(rows, table, row)
    }

    async fn update(
        &self,
        table: &TableSchema,
        key: &RowKey,
        changes: Row,
    ) -> Result<Option<Row>, RowStoreError> {
        let mut tables = self.lock()?;
        let rows = tables.entry(table.name()).or_default();
        let Some(index) = find_index(rows, key) else {
            return Ok(None);
        };
        let Some(existing) = rows.get(index) else {
            return Ok(None);
        };
        let mut updated = existing.clone();
        merge(&mut updated, project(table, changes));
        ensure_unique(table, rows, &updated, Some(index))?;
        if let Some(slot) = rows.get_mut(index) {
            *slot = updated.clone();
        }
        Ok(Some(updated))
    }

    async fn delete(
        &self,
        table: &TableSchema,
        key: &RowKey,
    ) -> Result<Option<Row>, RowStoreError> {
        let mut tables = self.lock()?;
        let rows = tables.entry(table.name()).or_default();
        Ok(find_index(rows, key).map(|index| rows.remove(index)))
    }

    async fn upsert(
        &self,
        table: &TableSchema,
        row: Row,
        conflict_field: &'static str,
    ) -> Result<Row, RowStoreError> {
        let mut tables = self.lock()?;
        let rows = tables.entry(table.name()).or_default();
        let existing = row.get(conflict_field).and_then(|value| {
            let key = RowKey {
                field: conflict_field,
                value: value.clone(),
            };
            find_index(rows, &key)
        });
        let Some(index) = existing else {
            return self.insert_locked(rows, table, row);
        };
        let Some(current) = rows.get(index) else {
            return self.insert_locked(rows, table, row);
        };
        let mut merged = current.clone();
        merge(&mut merged, project(table, row));
        ensure_unique(table, rows, &merged, Some(index))?;
        if let Some(slot) = rows.get_mut(index) {
            *slot = merged.clone();
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldDef, TableName};
    use chrono::{TimeZone, Utc};
    use mockable::MockClock;
    use rstest::{fixture, rstest};
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[fixture]
    fn schema() -> TableSchema {
        TableSchema::builder(TableName::Employees, "employees")
            .field(FieldDef::new("id", "id").defaults_to(FieldDefault::GeneratedUuid))
            .field(FieldDef::new("email", "email").unique())
            .field(FieldDef::new("rank", "rank"))
            .field(FieldDef::new("createdAt", "created_at").defaults_to(FieldDefault::Now))
            .build()
            .expect("valid schema")
    }

    #[fixture]
    fn store() -> InMemoryRowStore {
        let mut clock = MockClock::new();
        clock
            .expect_utc()
            .return_const(Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).single().expect("valid"));
        InMemoryRowStore::new(Arc::new(clock))
    }

    #[rstest]
    #[tokio::test]
    async fn insert_fills_defaults_and_drops_unknown_keys(
        store: InMemoryRowStore,
        schema: TableSchema,
    ) {
        let created = store
            .insert(&schema, row(json!({ "email": "a@example.com", "bogus": 1 })))
            .await
            .expect("insert succeeds");

        let id = created.get("id").and_then(Value::as_str).expect("generated id");
        assert!(Uuid::parse_str(id).is_ok());
        assert_eq!(created.get("createdAt"), Some(&json!("2026-03-02T09:30:00.000000Z")));
        assert_eq!(created.get("rank"), Some(&Value::Null));
        assert!(!created.contains_key("bogus"));
    }

    #[rstest]
    #[tokio::test]
    async fn unique_fields_reject_duplicates(store: InMemoryRowStore, schema: TableSchema) {
        store
            .insert(&schema, row(json!({ "email": "a@example.com" })))
            .await
            .expect("first insert");
        let err = store
            .insert(&schema, row(json!({ "email": "a@example.com" })))
            .await
            .expect_err("duplicate email");
        assert!(matches!(err, RowStoreError::Constraint { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn ordering_places_nulls_last_ascending_and_first_descending(
        store: InMemoryRowStore,
        schema: TableSchema,
    ) {
        for rank in [json!(2), json!(null), json!(1)] {
            store
                .insert(&schema, row(json!({ "rank": rank })))
                .await
                .expect("insert");
        }
        let ranks = |rows: Vec<Row>| -> Vec<Value> {
            rows.into_iter()
                .map(|row| row.get("rank").cloned().unwrap_or(Value::Null))
                .collect()
        };

        let ascending = Select {
            order: Some(OrderBy {
                field: "rank",
                direction: SortDirection::Asc,
            }),
            ..Select::default()
        };
        let rows = store.select(&schema, &ascending).await.expect("select");
        assert_eq!(ranks(rows), vec![json!(1), json!(2), Value::Null]);

        let descending = Select {
            order: Some(OrderBy {
                field: "rank",
                direction: SortDirection::Desc,
            }),
            limit: Some(2),
            ..Select::default()
        };
        let rows = store.select(&schema, &descending).await.expect("select");
        assert_eq!(ranks(rows), vec![Value::Null, json!(2)]);
    }

    #[rstest]
    #[tokio::test]
    async fn equality_never_matches_null(store: InMemoryRowStore, schema: TableSchema) {
        store
            .insert(&schema, row(json!({ "rank": null })))
            .await
            .expect("insert");
        let select = Select {
            conditions: vec![Condition::Equals {
                field: "rank",
                value: Value::Null,
            }],
            ..Select::default()
        };
        assert!(store.select(&schema, &select).await.expect("select").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn update_and_delete_report_missing_rows(store: InMemoryRowStore, schema: TableSchema) {
        let key = RowKey::identity(&schema, "missing");
        assert_eq!(
            store.update(&schema, &key, Row::new()).await.expect("update"),
            None
        );
        assert_eq!(store.delete(&schema, &key).await.expect("delete"), None);
    }

    #[rstest]
    #[tokio::test]
    async fn upsert_merges_into_the_conflicting_row(store: InMemoryRowStore, schema: TableSchema) {
        let first = store
            .upsert(&schema, row(json!({ "email": "a@example.com", "rank": 1 })), "email")
            .await
            .expect("first upsert");
        let second = store
            .upsert(&schema, row(json!({ "email": "a@example.com", "rank": 5 })), "email")
            .await
            .expect("second upsert");

        assert_eq!(first.get("id"), second.get("id"));
        assert_eq!(second.get("rank"), Some(&json!(5)));
        let all = store.select(&schema, &Select::default()).await.expect("select");
        assert_eq!(all.len(), 1);
    }
}
