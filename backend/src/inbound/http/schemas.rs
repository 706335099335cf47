//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the structure of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.

use std::collections::HashMap;

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or names an unknown field.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The table or row does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The write collides with existing data or targets an invalid conflict field.
    #[schema(rename = "conflict")]
    Conflict,
    /// The backing store cannot be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "unknown table: invoices")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::SortDirection`].
#[derive(ToSchema)]
#[schema(as = crate::domain::SortDirection)]
pub enum SortDirectionSchema {
    /// Smallest first.
    #[schema(rename = "asc")]
    Asc,
    /// Largest first.
    #[schema(rename = "desc")]
    Desc,
}

/// OpenAPI schema for [`crate::domain::Sort`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Sort)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SortSchema {
    /// Field name in either naming convention.
    #[schema(example = "createdAt")]
    field: String,
    /// Direction; ascending when omitted.
    direction: Option<SortDirectionSchema>,
}

/// OpenAPI schema for [`crate::domain::QuerySpec`].
///
/// Filters are ANDed equality matches; a `null` value selects rows where the
/// field is NULL.
#[derive(ToSchema)]
#[schema(as = crate::domain::QuerySpec)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct QuerySpecSchema {
    /// Field name to required value.
    #[schema(example = json!({ "status": "active", "deleted_at": null }))]
    filters: Option<HashMap<String, serde_json::Value>>,
    /// Optional ordering.
    sort: Option<SortSchema>,
    /// Maximum number of rows.
    #[schema(example = 20)]
    limit: Option<u32>,
}

/// OpenAPI schema for [`crate::domain::Row`].
///
/// One record keyed by camelCase field names.
#[derive(ToSchema)]
#[schema(as = crate::domain::Row)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RowSchema(HashMap<String, serde_json::Value>);

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_has_expected_name() {
        let name = ErrorCodeSchema::name();
        // utoipa replaces :: with . in schema names
        assert_eq!(name, "crate.domain.ErrorCode");
    }

    #[test]
    fn error_schema_uses_camel_case_trace_id() {
        let schema_json = schema_to_json::<ErrorSchema>();
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert!(
            schema_json.contains("traceId"),
            "schema should contain traceId field"
        );
    }

    #[test]
    fn error_code_schema_variants_match_domain() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "not_found",
            "conflict",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn query_spec_schema_lists_its_parts() {
        let schema_json = schema_to_json::<QuerySpecSchema>();
        for part in ["filters", "sort", "limit"] {
            assert!(schema_json.contains(part), "missing {part}");
        }
    }
}
