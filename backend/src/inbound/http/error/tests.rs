//! Tests for HTTP error mapping.

use super::*;
use crate::domain::Error;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn internal_error_case(expected_trace_id: String) -> Error {
    Error::internal("boom")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"secret": "x"}))
}

#[fixture]
fn invalid_request_case(expected_trace_id: String) -> Error {
    Error::invalid_request("bad")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"field": "name"}))
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn assert_error_response(
    error: Error,
    expected_status: StatusCode,
    expected_trace_id: Option<&str>,
) -> Error {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);

    let header = response.headers().get(TRACE_ID_HEADER);
    match expected_trace_id {
        Some(expected) => {
            let trace_id = header
                .expect("trace-id header is set by error_response")
                .to_str()
                .expect("trace-id not valid UTF-8");
            assert_eq!(trace_id, expected);
        }
        None => assert!(header.is_none(), "trace-id header should not be present"),
    }

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");

    serde_json::from_slice(&bytes).expect("Error JSON deserialisation succeeds")
}

#[rstest]
#[actix_web::test]
async fn error_responses_include_trace_id_and_payloads(
    #[from(internal_error_case)] internal_error: Error,
    #[from(invalid_request_case)] invalid_request: Error,
    expected_trace_id: String,
) {
    let redacted = assert_error_response(
        internal_error,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(expected_trace_id.as_str()),
    )
    .await;
    assert_eq!(redacted.code(), ErrorCode::InternalError);
    assert_eq!(redacted.message(), "Internal server error");
    assert!(redacted.details().is_none());

    let payload = assert_error_response(
        invalid_request,
        StatusCode::BAD_REQUEST,
        Some(expected_trace_id.as_str()),
    )
    .await;
    assert_eq!(payload.code(), ErrorCode::InvalidRequest);
    assert_eq!(payload.message(), "bad");
    assert_eq!(payload.details(), Some(&json!({"field": "name"})));
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_trace_header() {
    let error = Error::invalid_request("bad").with_details(json!({"field": "name"}));

    let payload = assert_error_response(error, StatusCode::BAD_REQUEST, None).await;
    assert_eq!(payload.code(), ErrorCode::InvalidRequest);
    assert_eq!(payload.trace_id(), None);
}

#[rstest]
#[case(DataAccessError::UnknownTable { name: "invoices".to_owned() }, ErrorCode::NotFound)]
#[case(DataAccessError::not_found("clients", "c-1"), ErrorCode::NotFound)]
#[case(DataAccessError::conflict("clients", "status"), ErrorCode::Conflict)]
#[case(DataAccessError::unmapped_field("clients", "bogus"), ErrorCode::InvalidRequest)]
#[case(
    DataAccessError::Store(RowStoreError::constraint("UniqueViolation on employees_email_key")),
    ErrorCode::Conflict
)]
#[case(
    DataAccessError::Store(RowStoreError::connection("refused")),
    ErrorCode::ServiceUnavailable
)]
#[case(
    DataAccessError::Store(RowStoreError::invalid_value("invalid input syntax for type uuid")),
    ErrorCode::InvalidRequest
)]
#[case(
    DataAccessError::Store(RowStoreError::query("syntax")),
    ErrorCode::InternalError
)]
fn data_access_errors_map_to_codes(#[case] err: DataAccessError, #[case] code: ErrorCode) {
    assert_eq!(Error::from(err).code(), code);
}

#[rstest]
fn not_found_details_name_table_and_id() {
    let err = Error::from(DataAccessError::not_found("clients", "c-1"));
    assert_eq!(err.message(), "no row in clients with identity c-1");
    assert_eq!(err.details(), Some(&json!({ "table": "clients", "id": "c-1" })));
}

#[rstest]
fn internal_redaction_keeps_trace_id() {
    let error = Error::internal("boom")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"secret": true}));

    let redacted = redact_if_internal(&error);
    assert_eq!(redacted.message(), "Internal server error");
    assert_eq!(redacted.trace_id(), Some(TRACE_ID));
    assert!(redacted.details().is_none());
}

#[test]
fn from_actix_error_is_redacted_internal_error() {
    use actix_web::error;

    let actix_err = error::ErrorBadRequest("boom");
    let err: Error = actix_err.into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.trace_id(), None);
    assert_eq!(err.details(), None);
}
