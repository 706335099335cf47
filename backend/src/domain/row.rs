//! Row values exchanged with callers and stores.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row as a JSON object keyed by field name.
///
/// The same shape is used in both vocabularies; which one a given `Row`
/// speaks depends on which side of the alias translator it sits.
pub type Row = serde_json::Map<String, Value>;

/// Caller-supplied data for one row.
///
/// Keys may use either vocabulary; values travel untouched to the store,
/// which applies its own column types.
///
/// # Examples
/// ```
/// use clientflow::domain::RowPayload;
/// use serde_json::json;
///
/// let payload: RowPayload =
///     serde_json::from_value(json!({ "full_name": "Acme Co" })).expect("object payload");
/// assert_eq!(payload.get("full_name"), Some(&json!("Acme Co")));
/// assert!(serde_json::from_value::<RowPayload>(json!(["not", "an", "object"])).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowPayload(Row);

impl RowPayload {
    /// Empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether the payload carries no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Unwrap into the underlying row.
    pub fn into_row(self) -> Row {
        self.0
    }
}

impl From<Row> for RowPayload {
    fn from(row: Row) -> Self {
        Self(row)
    }
}

impl From<RowPayload> for Row {
    fn from(payload: RowPayload) -> Self {
        payload.0
    }
}
