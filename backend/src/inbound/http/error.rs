//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn data-access failures into consistent JSON responses and
//! status codes.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::{error, warn};

use crate::domain::ports::RowStoreError;
use crate::domain::{DataAccessError, Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Self::internal("Internal server error")
    }
}

impl From<DataAccessError> for Error {
    fn from(err: DataAccessError) -> Self {
        let message = err.to_string();
        match err {
            DataAccessError::UnknownTable { name } => {
                Self::not_found(message).with_details(json!({ "table": name }))
            }
            DataAccessError::NotFound { table, id } => {
                Self::not_found(message).with_details(json!({ "table": table, "id": id }))
            }
            DataAccessError::Conflict { table, field } => Self::conflict(message)
                .with_details(json!({ "table": table, "conflictField": field })),
            DataAccessError::UnmappedField { table, field } => Self::invalid_request(message)
                .with_details(json!({ "table": table, "field": field })),
            DataAccessError::Store(store) => Self::from(store),
        }
    }
}

impl From<RowStoreError> for Error {
    fn from(err: RowStoreError) -> Self {
        match err {
            RowStoreError::Constraint { message } => {
                Self::conflict("write violates a table constraint")
                    .with_details(json!({ "constraint": message }))
            }
            RowStoreError::InvalidValue { message } => {
                Self::invalid_request("value does not match the field type")
                    .with_details(json!({ "reason": message }))
            }
            RowStoreError::Connection { message } => {
                warn!(%message, "row store unavailable");
                Self::service_unavailable("row store unavailable")
            }
            RowStoreError::Query { message } => {
                error!(%message, "row store query failed");
                Self::internal(message)
            }
        }
    }
}

/// Reject unreadable JSON bodies with a `400` carrying the standard payload.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request("request body is not valid JSON")
        .with_details(json!({ "reason": err.to_string() }))
        .into()
}

#[cfg(test)]
mod tests;
