//! SQL rendering for the row store adapter.
//!
//! Identifiers only ever come from the registry and are always quoted.
//! Values never appear in the SQL text: each statement binds at most two
//! `jsonb` parameters, and Postgres expands them with
//! `jsonb_populate_record(NULL::<table>, ...)` so every value is read with its
//! column's own type. Rows come back as one `jsonb` document per row built
//! by `to_jsonb`, keyed by column name.

use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::ports::{Condition, RowKey, Select};
use crate::domain::{Row, SortDirection, TableSchema};

/// Rendered statement plus its `jsonb` parameters in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Statement {
    pub(crate) sql: String,
    pub(crate) binds: Vec<Value>,
}

/// Quote an identifier, doubling embedded quotes.
pub(crate) fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Expression reading `column` from the record described by `param`.
fn populated(schema: &TableSchema, param: &str, column: &str) -> String {
    format!(
        "(jsonb_populate_record(NULL::{}, {param})).{}",
        quote_ident(schema.sql_name()),
        quote_ident(column)
    )
}

fn column_of(schema: &TableSchema, field: &str) -> Option<&'static str> {
    schema.field(field).map(|def| def.column())
}

/// Re-key an internal row by SQL column, dropping keys the table does not
/// declare.
fn to_columns(schema: &TableSchema, row: Row) -> Map<String, Value> {
    row.into_iter()
        .filter_map(|(key, value)| match column_of(schema, &key) {
            Some(column) => Some((column.to_owned(), value)),
            None => {
                debug!(table = %schema.name(), field = key.as_str(), "ignoring unknown field");
                None
            }
        })
        .collect()
}

/// Re-key a `to_jsonb` document from SQL columns to internal field names.
pub(crate) fn from_columns(schema: &TableSchema, document: Value) -> Row {
    let Value::Object(columns) = document else {
        return Row::new();
    };
    columns
        .into_iter()
        .filter_map(|(column, value)| {
            schema
                .field_by_column(&column)
                .map(|def| (def.name().to_owned(), value))
        })
        .collect()
}

fn key_predicate(schema: &TableSchema, key: &RowKey, param: &str) -> Option<(String, Value)> {
    let column = column_of(schema, key.field)?;
    let mut record = Map::new();
    record.insert(column.to_owned(), key.value.clone());
    let predicate = format!(
        "t.{} = {}",
        quote_ident(column),
        populated(schema, param, column)
    );
    Some((predicate, Value::Object(record)))
}

const RETURNING: &str = " RETURNING to_jsonb(t) AS data";

/// Render a select. Conditions on undeclared fields are skipped.
pub(crate) fn render_select(schema: &TableSchema, select: &Select) -> Statement {
    let mut sql = format!(
        "SELECT to_jsonb(t) AS data FROM {} AS t",
        quote_ident(schema.sql_name())
    );
    let mut predicates = Vec::with_capacity(select.conditions.len());
    let mut equals = Vec::new();
    for condition in &select.conditions {
        match condition {
            Condition::Equals { field, value } => {
                let Some(column) = column_of(schema, field) else {
                    continue;
                };
                let param = format!("$1 -> {}", equals.len());
                let mut record = Map::new();
                record.insert(column.to_owned(), value.clone());
                equals.push(Value::Object(record));
                predicates.push(format!(
                    "t.{} = {}",
                    quote_ident(column),
                    populated(schema, &param, column)
                ));
            }
            Condition::IsNull { field } => {
                if let Some(column) = column_of(schema, field) {
                    predicates.push(format!("t.{} IS NULL", quote_ident(column)));
                }
            }
        }
    }
    if !predicates.is_empty() {
        sql.push_str(&format!(" WHERE {}", predicates.join(" AND ")));
    }
    if let Some((column, direction)) = select.order.and_then(|order| {
        column_of(schema, order.field).map(|column| (column, order.direction))
    }) {
        let keyword = match direction {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        };
        sql.push_str(&format!(" ORDER BY t.{} {keyword}", quote_ident(column)));
    }
    if let Some(limit) = select.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    let binds = if equals.is_empty() {
        Vec::new()
    } else {
        vec![Value::Array(equals)]
    };
    Statement { sql, binds }
}

fn insert_head(schema: &TableSchema, values: &Map<String, Value>) -> String {
    let table = quote_ident(schema.sql_name());
    if values.is_empty() {
        return format!("INSERT INTO {table} AS t DEFAULT VALUES");
    }
    let columns: Vec<String> = values.keys().map(|column| quote_ident(column)).collect();
    let selected: Vec<String> = values
        .keys()
        .map(|column| format!("args.{}", quote_ident(column)))
        .collect();
    format!(
        "INSERT INTO {table} AS t ({}) SELECT {} FROM jsonb_populate_record(NULL::{table}, $1) AS args",
        columns.join(", "),
        selected.join(", ")
    )
}

/// Render an insert of the declared fields of `row`.
pub(crate) fn render_insert(schema: &TableSchema, row: Row) -> Statement {
    let values = to_columns(schema, row);
    let mut sql = insert_head(schema, &values);
    sql.push_str(RETURNING);
    let binds = if values.is_empty() {
        Vec::new()
    } else {
        vec![Value::Object(values)]
    };
    Statement { sql, binds }
}

/// Render an update of the row matching `key`.
///
/// Returns `None` when nothing would be written; callers then read the row
/// instead.
pub(crate) fn render_update(schema: &TableSchema, key: &RowKey, changes: Row) -> Option<Statement> {
    let values = to_columns(schema, changes);
    if values.is_empty() {
        return None;
    }
    let (predicate, key_record) = key_predicate(schema, key, "$2")?;
    let table = quote_ident(schema.sql_name());
    let assignments: Vec<String> = values
        .keys()
        .map(|column| format!("{0} = args.{0}", quote_ident(column)))
        .collect();
    let sql = format!(
        "UPDATE {table} AS t SET {} FROM jsonb_populate_record(NULL::{table}, $1) AS args WHERE {predicate}{RETURNING}",
        assignments.join(", ")
    );
    Some(Statement {
        sql,
        binds: vec![Value::Object(values), key_record],
    })
}

/// Render a delete of the row matching `key`.
pub(crate) fn render_delete(schema: &TableSchema, key: &RowKey) -> Option<Statement> {
    let (predicate, key_record) = key_predicate(schema, key, "$1")?;
    let sql = format!(
        "DELETE FROM {} AS t WHERE {predicate}{RETURNING}",
        quote_ident(schema.sql_name())
    );
    Some(Statement {
        sql,
        binds: vec![key_record],
    })
}

/// Render an upsert keyed on `conflict_field`.
///
/// A matching row is updated in place with only the supplied columns, so a
/// partial payload never has to satisfy the insert-side `NOT NULL`
/// constraints. The insert only runs when the update matched nothing; its
/// `ON CONFLICT` clause covers a row committed between the two.
pub(crate) fn render_upsert(schema: &TableSchema, row: Row, conflict_field: &str) -> Option<Statement> {
    let conflict_column = quote_ident(column_of(schema, conflict_field)?);
    let values = to_columns(schema, row);
    if values.is_empty() {
        return Some(Statement {
            sql: format!("{}{RETURNING}", insert_head(schema, &values)),
            binds: Vec::new(),
        });
    }
    let table = quote_ident(schema.sql_name());
    let assignments: Vec<String> = values
        .keys()
        .map(|column| format!("{0} = args.{0}", quote_ident(column)))
        .collect();
    let overwrites: Vec<String> = values
        .keys()
        .map(|column| format!("{0} = EXCLUDED.{0}", quote_ident(column)))
        .collect();
    let sql = format!(
        "WITH updated AS (\
         UPDATE {table} AS t SET {} \
         FROM jsonb_populate_record(NULL::{table}, $1) AS args \
         WHERE t.{conflict_column} = args.{conflict_column}{RETURNING}), \
         inserted AS ({} WHERE NOT EXISTS (SELECT 1 FROM updated) \
         ON CONFLICT ({conflict_column}) DO UPDATE SET {}{RETURNING}) \
         SELECT data FROM updated UNION ALL SELECT data FROM inserted",
        assignments.join(", "),
        insert_head(schema, &values),
        overwrites.join(", ")
    );
    Some(Statement {
        sql,
        binds: vec![Value::Object(values)],
    })
}
