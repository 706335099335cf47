//! Registry of the tables callers may address by name.
//!
//! The registry is built once at start-up, validated as a whole, and then
//! shared read-only behind an `Arc`. Each entry pairs a [`TableSchema`] with
//! the [`ColumnAliasMap`] used to translate that table's field names.

mod clientflow;

use std::collections::BTreeMap;

use super::{AliasMapError, ColumnAliasMap, SchemaError, TableName, TableSchema, UnknownTableName};

/// Problems detected while building the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A table declaration is inconsistent.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// A table's alias map breaks uniqueness.
    #[error("{table}: {source}")]
    Alias {
        /// Table whose map is invalid.
        table: TableName,
        /// Underlying alias problem.
        #[source]
        source: AliasMapError,
    },
    /// An alias points at a field the table does not declare.
    #[error("{table}: alias `{external}` targets undeclared field `{internal}`")]
    UnknownAliasTarget {
        /// Table being registered.
        table: TableName,
        /// External alias key.
        external: &'static str,
        /// Missing internal field.
        internal: &'static str,
    },
    /// The same logical name was registered twice.
    #[error("table `{table}` is registered twice")]
    DuplicateTable {
        /// Repeated table.
        table: TableName,
    },
}

/// A registered table: storage handle plus alias map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredTable {
    schema: TableSchema,
    aliases: ColumnAliasMap,
}

impl RegisteredTable {
    /// Storage handle.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Field name translator.
    pub fn aliases(&self) -> &ColumnAliasMap {
        &self.aliases
    }

    /// Resolve a caller-supplied field name (either vocabulary) to a declared
    /// internal field name.
    pub fn resolve_field(&self, field: &str) -> Option<&'static str> {
        let internal = self.aliases.field_to_internal(field);
        self.schema.field(internal).map(|def| def.name())
    }
}

/// Immutable map from logical table name to registered table.
///
/// # Examples
/// ```
/// use clientflow::domain::TableRegistry;
///
/// let registry = TableRegistry::clientflow().expect("valid declarations");
/// let clients = registry.resolve("clients").expect("registered");
/// assert_eq!(clients.aliases().internal_name("full_name"), Some("fullName"));
/// assert!(registry.resolve("invoices").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRegistry {
    tables: BTreeMap<TableName, RegisteredTable>,
}

impl TableRegistry {
    /// Empty registry; add tables with [`TableRegistry::register`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table together with its alias map.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateTable`] for a repeated name and
    /// [`RegistryError::UnknownAliasTarget`] when an alias points at a field
    /// the schema does not declare.
    pub fn register(
        mut self,
        schema: TableSchema,
        aliases: ColumnAliasMap,
    ) -> Result<Self, RegistryError> {
        let table = schema.name();
        if self.tables.contains_key(&table) {
            return Err(RegistryError::DuplicateTable { table });
        }
        if let Some((external, internal)) = aliases
            .pairs()
            .find(|(_, internal)| schema.field(internal).is_none())
        {
            return Err(RegistryError::UnknownAliasTarget {
                table,
                external,
                internal,
            });
        }
        self.tables.insert(table, RegisteredTable { schema, aliases });
        Ok(self)
    }

    /// Register a table whose aliases are derived from its column names.
    ///
    /// # Errors
    ///
    /// See [`TableRegistry::register`].
    pub fn register_derived(self, schema: TableSchema) -> Result<Self, RegistryError> {
        let aliases = ColumnAliasMap::for_schema(&schema).map_err(|source| RegistryError::Alias {
            table: schema.name(),
            source,
        })?;
        self.register(schema, aliases)
    }

    /// Look a table up by its external string name.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownTableName`] for anything that is not an exact,
    /// registered name.
    pub fn resolve(&self, name: &str) -> Result<&RegisteredTable, UnknownTableName> {
        let table: TableName = name.parse()?;
        self.get(table)
            .ok_or_else(|| UnknownTableName { name: name.to_owned() })
    }

    /// Look a table up by logical name.
    pub fn get(&self, table: TableName) -> Option<&RegisteredTable> {
        self.tables.get(&table)
    }

    /// Registered tables in name order.
    pub fn tables(&self) -> impl Iterator<Item = &RegisteredTable> {
        self.tables.values()
    }
}
