//! Generic query and mutation executors over registered tables.
//!
//! [`DataAccessService`] implements the [`TableAccess`] driving port on top of
//! any [`RowStore`]. Every call resolves the logical table, translates field
//! names into the internal vocabulary, applies the table's conventions
//! (`updatedAt` stamping, soft or hard delete, conflict target validation),
//! makes exactly one store call, and translates the result back.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::SecondsFormat;
use mockable::Clock;
use serde_json::Value;
use tracing::warn;

use super::ports::{Condition, OrderBy, RowKey, RowStore, Select, TableAccess};
use super::{
    DataAccessError, DeletePolicy, FilterValue, QuerySpec, RegisteredTable, Row, RowPayload,
    TableRegistry,
};

/// How caller-supplied field names the table does not declare are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Payload keys pass through to the store (which ignores them); unknown
    /// filter and sort fields are dropped with a warning.
    #[default]
    Lenient,
    /// Any unknown payload, filter, or sort field fails the call with
    /// [`DataAccessError::UnmappedField`].
    Strict,
}

/// Data-access service over a registry and a row store.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use clientflow::domain::{DataAccessService, TableRegistry};
/// use clientflow::outbound::memory::InMemoryRowStore;
/// use mockable::DefaultClock;
///
/// let registry = Arc::new(TableRegistry::clientflow().expect("valid registry"));
/// let clock = Arc::new(DefaultClock);
/// let store = Arc::new(InMemoryRowStore::new(clock.clone()));
/// let _service = DataAccessService::new(registry, store, clock);
/// ```
#[derive(Clone)]
pub struct DataAccessService {
    registry: Arc<TableRegistry>,
    store: Arc<dyn RowStore>,
    clock: Arc<dyn Clock>,
    policy: FieldPolicy,
}

impl DataAccessService {
    /// Create a lenient service.
    pub fn new(
        registry: Arc<TableRegistry>,
        store: Arc<dyn RowStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            store,
            clock,
            policy: FieldPolicy::Lenient,
        }
    }

    /// Replace the field policy.
    #[must_use]
    pub fn with_policy(mut self, policy: FieldPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Active field policy.
    pub fn policy(&self) -> FieldPolicy {
        self.policy
    }

    fn table(&self, name: &str) -> Result<&RegisteredTable, DataAccessError> {
        Ok(self.registry.resolve(name)?)
    }

    fn now(&self) -> Value {
        Value::String(self.clock.utc().to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    /// Translate a payload and enforce the field policy on its keys.
    fn internal_row(
        &self,
        table: &RegisteredTable,
        payload: RowPayload,
    ) -> Result<Row, DataAccessError> {
        let row = table.aliases().to_internal(payload.into_row());
        if self.policy == FieldPolicy::Strict {
            let schema = table.schema();
            if let Some(unknown) = row.keys().find(|key| schema.field(key).is_none()) {
                return Err(DataAccessError::unmapped_field(
                    schema.name().as_str(),
                    unknown.as_str(),
                ));
            }
        }
        Ok(row)
    }

    /// Resolve a filter or sort field; `None` means drop it.
    fn query_field(
        &self,
        table: &RegisteredTable,
        field: &str,
        role: &'static str,
    ) -> Result<Option<&'static str>, DataAccessError> {
        let table_name = table.schema().name().as_str();
        match table.resolve_field(field) {
            Some(resolved) => Ok(Some(resolved)),
            None if self.policy == FieldPolicy::Strict => {
                Err(DataAccessError::unmapped_field(table_name, field))
            }
            None => {
                warn!(table = table_name, field, role, "dropping unknown field");
                Ok(None)
            }
        }
    }

    fn select_for(
        &self,
        table: &RegisteredTable,
        spec: &QuerySpec,
    ) -> Result<Select, DataAccessError> {
        let mut conditions = Vec::with_capacity(spec.filters().len());
        for filter in spec.filters() {
            let Some(field) = self.query_field(table, &filter.field, "filter")? else {
                continue;
            };
            conditions.push(match &filter.value {
                FilterValue::Equals(value) => Condition::Equals {
                    field,
                    value: value.clone(),
                },
                FilterValue::IsNull => Condition::IsNull { field },
            });
        }

        let order = match spec.sort() {
            Some(sort) => self
                .query_field(table, &sort.field, "sort")?
                .map(|field| OrderBy {
                    field,
                    direction: sort.direction,
                }),
            None => None,
        };

        Ok(Select {
            conditions,
            order,
            limit: spec.limit_value(),
        })
    }

    fn stamp_updated_at(&self, table: &RegisteredTable, row: &mut Row) {
        let Some(field) = table.schema().updated_at_field() else {
            return;
        };
        if !row.contains_key(field) {
            row.insert(field.to_owned(), self.now());
        }
    }

    fn conflict_target(
        table: &RegisteredTable,
        requested: Option<&str>,
    ) -> Result<&'static str, DataAccessError> {
        let schema = table.schema();
        let Some(requested) = requested else {
            return Ok(schema.identity_field());
        };
        table
            .resolve_field(requested)
            .filter(|field| schema.is_conflict_target(field))
            .ok_or_else(|| DataAccessError::conflict(schema.name().as_str(), requested))
    }
}

#[async_trait]
impl TableAccess for DataAccessService {
    async fn query(&self, table: &str, spec: &QuerySpec) -> Result<Vec<Row>, DataAccessError> {
        let registered = self.table(table)?;
        let select = self.select_for(registered, spec)?;
        let rows = self.store.select(registered.schema(), &select).await?;
        Ok(rows
            .into_iter()
            .map(|row| registered.aliases().to_external(row))
            .collect())
    }

    async fn get(&self, table: &str, id: &str) -> Result<Row, DataAccessError> {
        let registered = self.table(table)?;
        let select = Select {
            conditions: vec![Condition::Equals {
                field: registered.schema().identity_field(),
                value: Value::from(id),
            }],
            order: None,
            limit: Some(1),
        };
        let rows = self.store.select(registered.schema(), &select).await?;
        rows.into_iter()
            .next()
            .map(|row| registered.aliases().to_external(row))
            .ok_or_else(|| DataAccessError::not_found(table, id))
    }

    async fn insert(&self, table: &str, payload: RowPayload) -> Result<Row, DataAccessError> {
        let registered = self.table(table)?;
        let row = self.internal_row(registered, payload)?;
        let created = self.store.insert(registered.schema(), row).await?;
        Ok(registered.aliases().to_external(created))
    }

    async fn update(
        &self,
        table: &str,
        id: &str,
        payload: RowPayload,
    ) -> Result<Row, DataAccessError> {
        let registered = self.table(table)?;
        let mut changes = self.internal_row(registered, payload)?;
        self.stamp_updated_at(registered, &mut changes);
        let key = RowKey::identity(registered.schema(), id);
        let updated = self
            .store
            .update(registered.schema(), &key, changes)
            .await?
            .ok_or_else(|| DataAccessError::not_found(table, id))?;
        Ok(registered.aliases().to_external(updated))
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), DataAccessError> {
        let registered = self.table(table)?;
        let schema = registered.schema();
        let key = RowKey::identity(schema, id);
        let affected = match schema.delete_policy() {
            DeletePolicy::SoftDelete { field } => {
                let mut tombstone = Row::new();
                tombstone.insert(field.to_owned(), self.now());
                self.store.update(schema, &key, tombstone).await?
            }
            DeletePolicy::HardDelete => self.store.delete(schema, &key).await?,
        };
        affected
            .map(|_| ())
            .ok_or_else(|| DataAccessError::not_found(table, id))
    }

    async fn upsert<'a>(
        &self,
        table: &str,
        payload: RowPayload,
        conflict_field: Option<&'a str>,
    ) -> Result<Row, DataAccessError> {
        let registered = self.table(table)?;
        let target = Self::conflict_target(registered, conflict_field)?;
        let mut row = self.internal_row(registered, payload)?;
        self.stamp_updated_at(registered, &mut row);
        let stored = self.store.upsert(registered.schema(), row, target).await?;
        Ok(registered.aliases().to_external(stored))
    }
}

#[cfg(test)]
#[path = "data_access_tests.rs"]
mod tests;
