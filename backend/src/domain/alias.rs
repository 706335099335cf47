//! Column alias translation between the external and internal vocabularies.
//!
//! Callers speak snake_case (the database's real column names); the field
//! vocabulary inside the layer is camelCase. A [`ColumnAliasMap`] renames the
//! keys of a row in either direction. Keys the map does not know pass through
//! untouched, so a caller already using internal names is never broken by an
//! incomplete map. Values are never inspected or coerced.

use std::collections::HashMap;

use serde_json::Value;

use super::{Row, TableSchema};

/// Invariant violations detected while building an alias map.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AliasMapError {
    /// The same external name appears twice.
    #[error("external name `{external}` is aliased twice")]
    DuplicateExternal {
        /// Repeated external name.
        external: &'static str,
    },
    /// Two external names map to the same internal name.
    #[error("internal name `{internal}` is the target of more than one alias")]
    DuplicateInternal {
        /// Internal name targeted twice.
        internal: &'static str,
    },
}

/// Per-table external → internal field name map.
///
/// # Examples
/// ```
/// use clientflow::domain::{ColumnAliasMap, Row};
/// use serde_json::json;
///
/// let aliases = ColumnAliasMap::new([("full_name", "fullName")]).expect("valid aliases");
/// let external: Row = serde_json::from_value(json!({ "full_name": "Acme Co", "status": "active" }))
///     .expect("object");
/// let internal = aliases.to_internal(external.clone());
/// assert_eq!(internal.get("fullName"), Some(&json!("Acme Co")));
/// assert_eq!(internal.get("status"), Some(&json!("active")));
/// assert_eq!(aliases.to_external(internal), external);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnAliasMap {
    forward: HashMap<&'static str, &'static str>,
    reverse: HashMap<&'static str, &'static str>,
}

impl ColumnAliasMap {
    /// Build a map from `(external, internal)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`AliasMapError`] when an external name repeats or two external
    /// names target the same internal name.
    pub fn new<I>(pairs: I) -> Result<Self, AliasMapError>
    where
        I: IntoIterator<Item = (&'static str, &'static str)>,
    {
        let mut map = Self::default();
        for (external, internal) in pairs {
            if map.forward.insert(external, internal).is_some() {
                return Err(AliasMapError::DuplicateExternal { external });
            }
            if map.reverse.insert(internal, external).is_some() {
                return Err(AliasMapError::DuplicateInternal { internal });
            }
        }
        Ok(map)
    }

    /// Derive the map from a table handle: every field whose SQL column differs
    /// from its internal name becomes an alias.
    ///
    /// # Errors
    ///
    /// Propagates [`AliasMapError`]; a validated [`TableSchema`] never
    /// produces one because its names and columns are already unique.
    pub fn for_schema(schema: &TableSchema) -> Result<Self, AliasMapError> {
        Self::new(
            schema
                .fields()
                .iter()
                .filter(|field| field.column() != field.name())
                .map(|field| (field.column(), field.name())),
        )
    }

    /// Internal name for an external key, if aliased.
    pub fn internal_name(&self, external: &str) -> Option<&'static str> {
        self.forward.get(external).copied()
    }

    /// External name for an internal key, if aliased.
    pub fn external_name(&self, internal: &str) -> Option<&'static str> {
        self.reverse.get(internal).copied()
    }

    /// Iterate `(external, internal)` pairs in no particular order.
    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.forward.iter().map(|(external, internal)| (*external, *internal))
    }

    /// Translate a single field name to the internal vocabulary.
    pub fn field_to_internal<'a>(&self, field: &'a str) -> &'a str {
        self.internal_name(field).unwrap_or(field)
    }

    /// Rename aliased keys to their internal names.
    ///
    /// When a row carries both spellings of the same field, the aliased
    /// (external) key wins.
    pub fn to_internal(&self, row: Row) -> Row {
        rename_keys(row, |key| self.internal_name(key))
    }

    /// Rename internal keys back to their external names.
    ///
    /// When a row carries both spellings of the same field, the aliased
    /// (internal) key wins.
    pub fn to_external(&self, row: Row) -> Row {
        rename_keys(row, |key| self.external_name(key))
    }
}

fn rename_keys<F>(row: Row, lookup: F) -> Row
where
    F: Fn(&str) -> Option<&'static str>,
{
    let mut renamed = Row::new();
    let mut aliased: Vec<(&'static str, Value)> = Vec::new();
    for (key, value) in row {
        match lookup(&key) {
            Some(target) => aliased.push((target, value)),
            None => {
                renamed.insert(key, value);
            }
        }
    }
    for (target, value) in aliased {
        renamed.insert(target.to_owned(), value);
    }
    renamed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[fixture]
    fn aliases() -> ColumnAliasMap {
        ColumnAliasMap::new([("full_name", "fullName"), ("created_at", "createdAt")])
            .expect("valid aliases")
    }

    #[rstest]
    #[case(json!("Acme Co"))]
    #[case(json!(null))]
    #[case(json!(42))]
    #[case(json!({ "nested": ["x"] }))]
    fn mapped_keys_round_trip(aliases: ColumnAliasMap, #[case] value: Value) {
        for (external, _) in aliases.pairs() {
            let mut original = Row::new();
            original.insert(external.to_owned(), value.clone());
            let back = aliases.to_external(aliases.to_internal(original.clone()));
            assert_eq!(back, original);
        }
    }

    #[rstest]
    fn unknown_keys_pass_through_both_ways(aliases: ColumnAliasMap) {
        let original = row(json!({ "status": "active", "someCamel": 1 }));
        assert_eq!(aliases.to_internal(original.clone()), original);
        assert_eq!(aliases.to_external(original.clone()), original);
    }

    #[rstest]
    fn aliased_spelling_wins_over_passthrough(aliases: ColumnAliasMap) {
        let both = row(json!({ "full_name": "external", "fullName": "internal" }));
        let internal = aliases.to_internal(both);
        assert_eq!(internal, row(json!({ "fullName": "external" })));
    }

    #[rstest]
    fn rejects_repeated_external_name() {
        let err = ColumnAliasMap::new([("full_name", "fullName"), ("full_name", "name")])
            .expect_err("duplicate external");
        assert_eq!(err, AliasMapError::DuplicateExternal { external: "full_name" });
    }

    #[rstest]
    fn rejects_repeated_internal_target() {
        let err = ColumnAliasMap::new([("full_name", "fullName"), ("fullname", "fullName")])
            .expect_err("duplicate internal");
        assert_eq!(err, AliasMapError::DuplicateInternal { internal: "fullName" });
    }

    #[rstest]
    fn single_field_translation_falls_back_to_input(aliases: ColumnAliasMap) {
        assert_eq!(aliases.field_to_internal("created_at"), "createdAt");
        assert_eq!(aliases.field_to_internal("status"), "status");
    }
}
