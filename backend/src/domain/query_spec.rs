//! Read specifications: equality filters, an optional sort, an optional limit.
//!
//! A [`QuerySpec`] is built fresh for every read and never persisted. Its JSON
//! form is what the HTTP adapter accepts:
//!
//! ```json
//! {
//!   "filters": { "status": "active", "deleted_at": null },
//!   "sort": { "field": "created_at", "direction": "desc" },
//!   "limit": 20
//! }
//! ```
//!
//! A JSON `null` filter value is the IS-NULL marker; every other value is an
//! equality match.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Right-hand side of one filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// Field equals the value.
    Equals(Value),
    /// Field is NULL (or absent).
    IsNull,
}

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::IsNull,
            other => Self::Equals(other),
        }
    }
}

/// One filter entry; filters always combine with AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Field name in either vocabulary.
    pub field: String,
    /// Condition on the field.
    pub value: FilterValue,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

/// Sort clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    /// Field name in either vocabulary.
    pub field: String,
    /// Direction; ascending when omitted.
    #[serde(default)]
    pub direction: SortDirection,
}

/// Specification of one read.
///
/// # Examples
/// ```
/// use clientflow::domain::{FilterValue, QuerySpec, SortDirection};
/// use serde_json::json;
///
/// let spec = QuerySpec::new()
///     .filter("status", json!("active"))
///     .filter("deleted_at", json!(null))
///     .sort_by("created_at", SortDirection::Desc)
///     .limit(10);
/// assert_eq!(spec.filters()[1].value, FilterValue::IsNull);
/// assert_eq!(spec.limit_value(), Some(10));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "QuerySpecDto")]
pub struct QuerySpec {
    filters: Vec<Filter>,
    sort: Option<Sort>,
    limit: Option<u32>,
}

impl QuerySpec {
    /// An unfiltered, unsorted, unlimited read.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality (or IS-NULL, for `null`) filter.
    #[must_use]
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            value: FilterValue::from(value.into()),
        });
        self
    }

    /// Order by `field`.
    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some(Sort {
            field: field.into(),
            direction,
        });
        self
    }

    /// Cap the number of returned rows.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Filters in insertion order.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Sort clause, if any.
    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    /// Row cap, if any.
    pub fn limit_value(&self) -> Option<u32> {
        self.limit
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct QuerySpecDto {
    #[serde(default)]
    filters: serde_json::Map<String, Value>,
    #[serde(default)]
    sort: Option<Sort>,
    #[serde(default)]
    limit: Option<u32>,
}

impl From<QuerySpecDto> for QuerySpec {
    fn from(dto: QuerySpecDto) -> Self {
        Self {
            filters: dto
                .filters
                .into_iter()
                .map(|(field, value)| Filter {
                    field,
                    value: FilterValue::from(value),
                })
                .collect(),
            sort: dto.sort,
            limit: dto.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn null_filter_values_become_is_null() {
        let spec: QuerySpec = serde_json::from_value(json!({
            "filters": { "deleted_at": null, "status": "active" }
        }))
        .expect("valid spec");
        let deleted = spec
            .filters()
            .iter()
            .find(|filter| filter.field == "deleted_at")
            .expect("deleted_at filter");
        assert_eq!(deleted.value, FilterValue::IsNull);
        let status = spec
            .filters()
            .iter()
            .find(|filter| filter.field == "status")
            .expect("status filter");
        assert_eq!(status.value, FilterValue::Equals(json!("active")));
    }

    #[rstest]
    fn sort_direction_defaults_to_ascending() {
        let spec: QuerySpec =
            serde_json::from_value(json!({ "sort": { "field": "name" } })).expect("valid spec");
        let sort = spec.sort().expect("sort clause");
        assert_eq!(sort.direction, SortDirection::Asc);
    }

    #[rstest]
    fn empty_body_is_an_unbounded_read() {
        let spec: QuerySpec = serde_json::from_value(json!({})).expect("valid spec");
        assert_eq!(spec, QuerySpec::new());
    }

    #[rstest]
    #[case(json!({ "limit": -1 }))]
    #[case(json!({ "sort": { "field": "name", "direction": "sideways" } }))]
    #[case(json!({ "order": "name" }))]
    fn malformed_specs_are_rejected(#[case] body: Value) {
        assert!(serde_json::from_value::<QuerySpec>(body).is_err());
    }
}
