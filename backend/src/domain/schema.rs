//! Storage handles describing how a logical table is laid out.
//!
//! A [`TableSchema`] is the opaque handle the registry hands to row stores.
//! It lists the table's fields in the internal (camelCase) vocabulary
//! together with the SQL column each one is persisted in, and carries the
//! per-table conventions the mutation executor relies on: which field
//! identifies a row, whether deletes are soft or hard, and which field
//! tracks the last modification time.

use super::TableName;

/// Value a store fills in when an inserted row omits the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    /// A random UUID v4 rendered as a string.
    GeneratedUuid,
    /// The store's current UTC time.
    Now,
}

/// One field of a table handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    name: &'static str,
    column: &'static str,
    unique: bool,
    default: Option<FieldDefault>,
}

impl FieldDef {
    /// Declare a field by internal name and SQL column.
    pub const fn new(name: &'static str, column: &'static str) -> Self {
        Self {
            name,
            column,
            unique: false,
            default: None,
        }
    }

    /// Mark the field as carrying a unique constraint.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Attach a server-side default.
    #[must_use]
    pub const fn defaults_to(mut self, default: FieldDefault) -> Self {
        self.default = Some(default);
        self
    }

    /// Internal (camelCase) field name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// SQL column name.
    pub const fn column(&self) -> &'static str {
        self.column
    }

    /// Whether the field is unique-constrained.
    pub const fn is_unique(&self) -> bool {
        self.unique
    }

    /// Server-side default, if any.
    pub const fn default(&self) -> Option<FieldDefault> {
        self.default
    }
}

/// How `delete` treats rows of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Physically remove the row.
    HardDelete,
    /// Stamp the named field with the deletion time and keep the row.
    SoftDelete {
        /// Internal name of the tombstone timestamp field.
        field: &'static str,
    },
}

/// Problems detected while declaring a table handle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Two fields share an internal name.
    #[error("{table}: field `{field}` is declared twice")]
    DuplicateField {
        /// Table being declared.
        table: TableName,
        /// Repeated field name.
        field: &'static str,
    },
    /// Two fields share a SQL column.
    #[error("{table}: column `{column}` is declared twice")]
    DuplicateColumn {
        /// Table being declared.
        table: TableName,
        /// Repeated column name.
        column: &'static str,
    },
    /// A convention refers to a field the table does not declare.
    #[error("{table}: {role} field `{field}` is not declared")]
    MissingField {
        /// Table being declared.
        table: TableName,
        /// Which convention referred to the field.
        role: &'static str,
        /// Undeclared field name.
        field: &'static str,
    },
}

/// Storage handle for one table.
///
/// # Examples
/// ```
/// use clientflow::domain::{DeletePolicy, FieldDef, TableName, TableSchema};
///
/// let schema = TableSchema::builder(TableName::Notifications, "notifications")
///     .field(FieldDef::new("id", "id"))
///     .field(FieldDef::new("readAt", "read_at"))
///     .build()
///     .expect("valid declaration");
/// assert_eq!(schema.identity_field(), "id");
/// assert_eq!(schema.delete_policy(), DeletePolicy::HardDelete);
/// assert_eq!(schema.field("readAt").map(|f| f.column()), Some("read_at"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    name: TableName,
    sql_name: &'static str,
    fields: Vec<FieldDef>,
    identity: &'static str,
    delete_policy: DeletePolicy,
    updated_at: Option<&'static str>,
}

impl TableSchema {
    /// Start declaring a table stored under `sql_name`.
    pub fn builder(name: TableName, sql_name: &'static str) -> TableSchemaBuilder {
        TableSchemaBuilder {
            name,
            sql_name,
            fields: Vec::new(),
            identity: "id",
            delete_policy: DeletePolicy::HardDelete,
            updated_at: None,
        }
    }

    /// Logical table name.
    pub fn name(&self) -> TableName {
        self.name
    }

    /// SQL relation name.
    pub fn sql_name(&self) -> &'static str {
        self.sql_name
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Look up a field by internal name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Look up a field by SQL column.
    pub fn field_by_column(&self, column: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.column == column)
    }

    /// Field that identifies a single row.
    pub fn identity_field(&self) -> &'static str {
        self.identity
    }

    /// Delete behaviour for this table.
    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    /// Last-modified field maintained on every update, if the table has one.
    pub fn updated_at_field(&self) -> Option<&'static str> {
        self.updated_at
    }

    /// Whether `field` can serve as an upsert conflict target.
    ///
    /// The identity field always qualifies; other fields qualify only when
    /// they are declared unique.
    pub fn is_conflict_target(&self, field: &str) -> bool {
        field == self.identity || self.field(field).is_some_and(FieldDef::is_unique)
    }
}

/// Builder returned by [`TableSchema::builder`].
#[derive(Debug, Clone)]
pub struct TableSchemaBuilder {
    name: TableName,
    sql_name: &'static str,
    fields: Vec<FieldDef>,
    identity: &'static str,
    delete_policy: DeletePolicy,
    updated_at: Option<&'static str>,
}

impl TableSchemaBuilder {
    /// Append a field.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Override the identity field (defaults to `id`).
    #[must_use]
    pub fn identity(mut self, field: &'static str) -> Self {
        self.identity = field;
        self
    }

    /// Soft-delete rows by stamping `field`.
    #[must_use]
    pub fn soft_delete(mut self, field: &'static str) -> Self {
        self.delete_policy = DeletePolicy::SoftDelete { field };
        self
    }

    /// Maintain `field` as the last-modified timestamp.
    #[must_use]
    pub fn updated_at(mut self, field: &'static str) -> Self {
        self.updated_at = Some(field);
        self
    }

    /// Validate the declaration.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when field names or columns repeat, or when the
    /// identity, soft-delete, or updated-at conventions name an undeclared
    /// field.
    pub fn build(self) -> Result<TableSchema, SchemaError> {
        let table = self.name;
        for (index, field) in self.fields.iter().enumerate() {
            let earlier = self.fields.get(..index).unwrap_or_default();
            if earlier.iter().any(|other| other.name == field.name) {
                return Err(SchemaError::DuplicateField {
                    table,
                    field: field.name,
                });
            }
            if earlier.iter().any(|other| other.column == field.column) {
                return Err(SchemaError::DuplicateColumn {
                    table,
                    column: field.column,
                });
            }
        }

        let declared = |field: &'static str| self.fields.iter().any(|f| f.name == field);
        let mut conventions = vec![("identity", self.identity)];
        if let DeletePolicy::SoftDelete { field } = self.delete_policy {
            conventions.push(("soft-delete", field));
        }
        if let Some(field) = self.updated_at {
            conventions.push(("updated-at", field));
        }
        if let Some((role, field)) = conventions.into_iter().find(|(_, f)| !declared(f)) {
            return Err(SchemaError::MissingField { table, role, field });
        }

        Ok(TableSchema {
            name: self.name,
            sql_name: self.sql_name,
            fields: self.fields,
            identity: self.identity,
            delete_policy: self.delete_policy,
            updated_at: self.updated_at,
        })
    }
}
