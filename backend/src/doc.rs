//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: the generic table endpoints and the health probes
//! - **Schemas**: domain type wrappers ([`ErrorSchema`], [`QuerySpecSchema`],
//!   [`RowSchema`] and friends) that provide OpenAPI definitions without
//!   coupling domain types to the utoipa framework
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, QuerySpecSchema, RowSchema, SortDirectionSchema, SortSchema,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ClientFlow data API",
        description = "Generic query and mutation endpoints over the ClientFlow tables, plus health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::tables::query_rows,
        crate::inbound::http::tables::get_row,
        crate::inbound::http::tables::insert_row,
        crate::inbound::http::tables::update_row,
        crate::inbound::http::tables::delete_row,
        crate::inbound::http::tables::upsert_row,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        QuerySpecSchema,
        SortSchema,
        SortDirectionSchema,
        RowSchema
    )),
    tags(
        (name = "tables", description = "Generic operations over registered tables"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
