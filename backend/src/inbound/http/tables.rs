//! Generic table HTTP handlers.
//!
//! ```text
//! POST   /api/v1/tables/{table}/query
//! GET    /api/v1/tables/{table}/{id}
//! POST   /api/v1/tables/{table}
//! PATCH  /api/v1/tables/{table}/{id}
//! DELETE /api/v1/tables/{table}/{id}
//! PUT    /api/v1/tables/{table}?onConflict={field}
//! ```
//!
//! Handlers only unpack the request and call the [`TableAccess`] port; table
//! conventions and field translation live in the domain.
//!
//! [`TableAccess`]: crate::domain::ports::TableAccess

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{QuerySpec, Row, RowPayload};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, QuerySpecSchema, RowSchema};
use crate::inbound::http::state::HttpState;

/// Query string accepted by the upsert endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct UpsertParams {
    /// Field whose value decides insert versus overwrite; the table's
    /// identity field when omitted.
    pub on_conflict: Option<String>,
}

/// Read rows matching a filter set.
#[utoipa::path(
    post,
    path = "/api/v1/tables/{table}/query",
    params(("table" = String, Path, description = "Logical table name")),
    request_body = QuerySpecSchema,
    responses(
        (status = 200, description = "Matching rows", body = [RowSchema]),
        (status = 400, description = "Invalid query", body = ErrorSchema),
        (status = 404, description = "Unknown table", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["tables"],
    operation_id = "queryRows"
)]
#[post("/tables/{table}/query")]
pub async fn query_rows(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    spec: web::Json<QuerySpec>,
) -> ApiResult<web::Json<Vec<Row>>> {
    let table = path.into_inner();
    let rows = state.tables.query(&table, &spec).await?;
    Ok(web::Json(rows))
}

/// Fetch one row by identity.
#[utoipa::path(
    get,
    path = "/api/v1/tables/{table}/{id}",
    params(
        ("table" = String, Path, description = "Logical table name"),
        ("id" = String, Path, description = "Identity value")
    ),
    responses(
        (status = 200, description = "The row", body = RowSchema),
        (status = 400, description = "Identity does not match the field type", body = ErrorSchema),
        (status = 404, description = "Unknown table or row", body = ErrorSchema)
    ),
    tags = ["tables"],
    operation_id = "getRow"
)]
#[get("/tables/{table}/{id}")]
pub async fn get_row(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<Row>> {
    let (table, id) = path.into_inner();
    let row = state.tables.get(&table, &id).await?;
    Ok(web::Json(row))
}

/// Insert one row.
#[utoipa::path(
    post,
    path = "/api/v1/tables/{table}",
    params(("table" = String, Path, description = "Logical table name")),
    request_body = RowSchema,
    responses(
        (status = 201, description = "The stored row", body = RowSchema),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 404, description = "Unknown table", body = ErrorSchema),
        (status = 409, description = "Constraint violation", body = ErrorSchema)
    ),
    tags = ["tables"],
    operation_id = "insertRow"
)]
#[post("/tables/{table}")]
pub async fn insert_row(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<RowPayload>,
) -> ApiResult<HttpResponse> {
    let table = path.into_inner();
    let row = state.tables.insert(&table, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(row))
}

/// Overwrite fields of one row.
#[utoipa::path(
    patch,
    path = "/api/v1/tables/{table}/{id}",
    params(
        ("table" = String, Path, description = "Logical table name"),
        ("id" = String, Path, description = "Identity value")
    ),
    request_body = RowSchema,
    responses(
        (status = 200, description = "The updated row", body = RowSchema),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 404, description = "Unknown table or row", body = ErrorSchema),
        (status = 409, description = "Constraint violation", body = ErrorSchema)
    ),
    tags = ["tables"],
    operation_id = "updateRow"
)]
#[patch("/tables/{table}/{id}")]
pub async fn update_row(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
    payload: web::Json<RowPayload>,
) -> ApiResult<web::Json<Row>> {
    let (table, id) = path.into_inner();
    let row = state.tables.update(&table, &id, payload.into_inner()).await?;
    Ok(web::Json(row))
}

/// Delete one row, softly where the table keeps tombstones.
#[utoipa::path(
    delete,
    path = "/api/v1/tables/{table}/{id}",
    params(
        ("table" = String, Path, description = "Logical table name"),
        ("id" = String, Path, description = "Identity value")
    ),
    responses(
        (status = 204, description = "Row deleted"),
        (status = 404, description = "Unknown table or row", body = ErrorSchema)
    ),
    tags = ["tables"],
    operation_id = "deleteRow"
)]
#[delete("/tables/{table}/{id}")]
pub async fn delete_row(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (table, id) = path.into_inner();
    state.tables.delete(&table, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Insert a row or overwrite the one sharing its conflict field value.
#[utoipa::path(
    put,
    path = "/api/v1/tables/{table}",
    params(
        ("table" = String, Path, description = "Logical table name"),
        UpsertParams
    ),
    request_body = RowSchema,
    responses(
        (status = 200, description = "The stored row", body = RowSchema),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 404, description = "Unknown table", body = ErrorSchema),
        (status = 409, description = "Invalid conflict target", body = ErrorSchema)
    ),
    tags = ["tables"],
    operation_id = "upsertRow"
)]
#[put("/tables/{table}")]
pub async fn upsert_row(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    params: web::Query<UpsertParams>,
    payload: web::Json<RowPayload>,
) -> ApiResult<web::Json<Row>> {
    let table = path.into_inner();
    let UpsertParams { on_conflict } = params.into_inner();
    let row = state
        .tables
        .upsert(&table, payload.into_inner(), on_conflict.as_deref())
        .await?;
    Ok(web::Json(row))
}

/// Register every table handler on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(query_rows)
        .service(get_row)
        .service(insert_row)
        .service(update_row)
        .service(delete_row)
        .service(upsert_row);
}

#[cfg(test)]
#[path = "tables_tests.rs"]
mod tests;
