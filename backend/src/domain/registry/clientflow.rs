//! Table declarations for the ClientFlow schema.
//!
//! Every logical table is declared through one exhaustive `match`, so adding
//! a [`TableName`] variant without declaring its layout fails to compile.

use crate::domain::{FieldDef, FieldDefault, TableName, TableSchema};

use super::{RegistryError, TableRegistry};

const fn id() -> FieldDef {
    FieldDef::new("id", "id").defaults_to(FieldDefault::GeneratedUuid)
}

const fn created_at() -> FieldDef {
    FieldDef::new("createdAt", "created_at").defaults_to(FieldDefault::Now)
}

const fn updated_at() -> FieldDef {
    FieldDef::new("updatedAt", "updated_at").defaults_to(FieldDefault::Now)
}

const fn deleted_at() -> FieldDef {
    FieldDef::new("deletedAt", "deleted_at")
}

const fn field(name: &'static str, column: &'static str) -> FieldDef {
    FieldDef::new(name, column)
}

/// Build the storage handle for one ClientFlow table.
fn declare(table: TableName) -> Result<TableSchema, RegistryError> {
    let builder = TableSchema::builder(table, table.as_str());
    let builder = match table {
        TableName::Organizations => builder
            .field(id())
            .field(field("name", "name"))
            .field(field("slug", "slug").unique())
            .field(field("logoUrl", "logo_url"))
            .field(field("billingEmail", "billing_email"))
            .field(created_at())
            .field(updated_at())
            .field(deleted_at())
            .updated_at("updatedAt")
            .soft_delete("deletedAt"),
        TableName::Profiles => builder
            .field(field("userId", "user_id"))
            .field(field("organizationId", "organization_id"))
            .field(field("email", "email").unique())
            .field(field("fullName", "full_name"))
            .field(field("role", "role"))
            .field(field("avatarUrl", "avatar_url"))
            .field(created_at())
            .field(updated_at())
            .identity("userId")
            .updated_at("updatedAt"),
        TableName::Clients => builder
            .field(id())
            .field(field("organizationId", "organization_id"))
            .field(field("fullName", "full_name"))
            .field(field("companyName", "company_name"))
            .field(field("email", "email"))
            .field(field("phone", "phone"))
            .field(field("industry", "industry"))
            .field(field("status", "status"))
            .field(field("monthlyRetainer", "monthly_retainer"))
            .field(field("startDate", "start_date"))
            .field(created_at())
            .field(updated_at())
            .field(deleted_at())
            .updated_at("updatedAt")
            .soft_delete("deletedAt"),
        TableName::Employees => builder
            .field(id())
            .field(field("organizationId", "organization_id"))
            .field(field("fullName", "full_name"))
            .field(field("email", "email").unique())
            .field(field("role", "role"))
            .field(field("hourlyRate", "hourly_rate"))
            .field(field("isActive", "is_active"))
            .field(created_at())
            .field(updated_at())
            .field(deleted_at())
            .updated_at("updatedAt")
            .soft_delete("deletedAt"),
        TableName::ClientAssignments => builder
            .field(id())
            .field(field("clientId", "client_id"))
            .field(field("employeeId", "employee_id"))
            .field(field("role", "role"))
            .field(field("allocationPercent", "allocation_percent"))
            .field(field("startDate", "start_date"))
            .field(field("endDate", "end_date"))
            .field(created_at())
            .field(updated_at())
            .updated_at("updatedAt"),
        TableName::WeeklyReports => builder
            .field(id())
            .field(field("clientId", "client_id"))
            .field(field("authorId", "author_id"))
            .field(field("weekStarting", "week_starting"))
            .field(field("status", "status"))
            .field(field("summary", "summary"))
            .field(field("wins", "wins"))
            .field(field("blockers", "blockers"))
            .field(field("nextSteps", "next_steps"))
            .field(created_at())
            .field(updated_at())
            .field(deleted_at())
            .updated_at("updatedAt")
            .soft_delete("deletedAt"),
        TableName::Budgets => builder
            .field(id())
            .field(field("clientId", "client_id"))
            .field(field("periodStart", "period_start"))
            .field(field("periodEnd", "period_end"))
            .field(field("amount", "amount"))
            .field(field("spent", "spent"))
            .field(field("currency", "currency"))
            .field(created_at())
            .field(updated_at())
            .field(deleted_at())
            .updated_at("updatedAt")
            .soft_delete("deletedAt"),
        TableName::Timesheets => builder
            .field(id())
            .field(field("employeeId", "employee_id"))
            .field(field("clientId", "client_id"))
            .field(field("workDate", "work_date"))
            .field(field("hours", "hours"))
            .field(field("description", "description"))
            .field(field("billable", "billable"))
            .field(created_at())
            .field(updated_at())
            .updated_at("updatedAt"),
        TableName::HealthScores => builder
            .field(id())
            .field(field("clientId", "client_id").unique())
            .field(field("score", "score"))
            .field(field("trend", "trend"))
            .field(field("factors", "factors"))
            .field(FieldDef::new("calculatedAt", "calculated_at").defaults_to(FieldDefault::Now)),
        TableName::Notifications => builder
            .field(id())
            .field(field("userId", "user_id"))
            .field(field("title", "title"))
            .field(field("body", "body"))
            .field(field("kind", "kind"))
            .field(field("link", "link"))
            .field(field("readAt", "read_at"))
            .field(created_at()),
    };
    builder.build().map_err(RegistryError::from)
}

impl TableRegistry {
    /// The registry of every ClientFlow table, with aliases derived from the
    /// snake_case column names.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if a declaration is inconsistent.
    pub fn clientflow() -> Result<Self, RegistryError> {
        TableName::ALL
            .into_iter()
            .try_fold(Self::new(), |registry, table| {
                registry.register_derived(declare(table)?)
            })
    }
}
