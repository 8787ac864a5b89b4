//! Maps what the data store sent back onto the uniform `{status, body}` contract.

use super::error::{ApiError, ApiResult};
use super::request_mapper::Operation;
use crate::infra::data_api::{RemoteResponse, TransportError};
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

/// Status and JSON body returned to the client for every operation.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    pub status: StatusCode,
    pub body: JsonValue,
}

impl HandlerResponse {
    pub fn new(status: StatusCode, body: JsonValue) -> Self {
        Self { status, body }
    }
}

impl From<ApiError> for HandlerResponse {
    fn from(err: ApiError) -> Self {
        Self::new(err.status_code(), err.body())
    }
}

/// Body of a successful delete. `deleted == 0` means the id matched nothing.
#[derive(Serialize, Debug, ToSchema)]
pub struct DeleteSummary {
    pub deleted: usize,
    #[schema(value_type = Vec<crate::domain::Potato>)]
    pub rows: Vec<JsonValue>,
}

/// Normalizes the outcome of the single remote call made for `operation`.
pub fn normalize(
    operation: Operation,
    outcome: Result<RemoteResponse, TransportError>,
) -> ApiResult<HandlerResponse> {
    let response = outcome?;

    if !response.status.is_success() {
        return Err(ApiError::Upstream {
            status: response.status,
            body: relay_body(response.status, &response.body)?,
        });
    }

    let rows = decode_rows(&response.body)?;
    let status = operation.success_status();

    match operation {
        Operation::List => Ok(HandlerResponse::new(status, JsonValue::Array(rows))),
        Operation::Create => {
            let created = rows.into_iter().next().ok_or_else(|| {
                ApiError::Transport("Data store returned no row for the created record".to_string())
            })?;
            Ok(HandlerResponse::new(status, created))
        }
        // An id that matches nothing still succeeds, with a `null` body.
        Operation::Update => {
            let updated = rows.into_iter().next().unwrap_or(JsonValue::Null);
            Ok(HandlerResponse::new(status, updated))
        }
        Operation::Delete => {
            let summary = DeleteSummary {
                deleted: rows.len(),
                rows,
            };
            let body = serde_json::to_value(summary)
                .map_err(|e| ApiError::Transport(format!("Failed to encode delete summary: {}", e)))?;
            Ok(HandlerResponse::new(status, body))
        }
    }
}

/// Successful answers must be a JSON array of rows; anything else is a malformed reply.
fn decode_rows(body: &str) -> ApiResult<Vec<JsonValue>> {
    match serde_json::from_str::<JsonValue>(body) {
        Ok(JsonValue::Array(rows)) => Ok(rows),
        Ok(other) => Err(ApiError::Transport(format!(
            "Malformed data store response: expected a row array, got {}",
            kind_of(&other)
        ))),
        Err(e) => Err(ApiError::Transport(format!(
            "Malformed data store response: {}",
            e
        ))),
    }
}

/// Error bodies are echoed as-is. A body that is not JSON (e.g. a proxy's HTML page) is a
/// malformed reply like any other.
fn relay_body(status: StatusCode, body: &str) -> ApiResult<JsonValue> {
    if body.trim().is_empty() {
        return Ok(JsonValue::Null);
    }
    serde_json::from_str(body).map_err(|e| {
        ApiError::Transport(format!(
            "Malformed data store response (status {}): {}",
            status.as_u16(),
            e
        ))
    })
}

fn kind_of(v: &JsonValue) -> &'static str {
    match v {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ok(body: JsonValue) -> Result<RemoteResponse, TransportError> {
        Ok(RemoteResponse {
            status: StatusCode::OK,
            body: body.to_string(),
        })
    }

    fn row(id: i64) -> JsonValue {
        json!({
            "id": id,
            "name": "Russet",
            "weight_kg": 1.5,
            "quantity": 10,
            "harvest_date": "2024-05-01",
            "is_organic": true
        })
    }

    #[test]
    fn create_returns_201_with_the_first_row() {
        let resp = normalize(Operation::Create, ok(json!([row(1)]))).unwrap();
        assert_eq!(resp.status, StatusCode::CREATED);
        assert_eq!(resp.body, row(1));
    }

    #[test]
    fn create_with_no_rows_is_a_transport_error() {
        let err = normalize(Operation::Create, ok(json!([]))).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[test]
    fn list_returns_rows_as_received() {
        let rows = json!([row(1), row(2)]);
        let resp = normalize(Operation::List, ok(rows.clone())).unwrap();
        assert_eq!(resp, HandlerResponse::new(StatusCode::OK, rows));
    }

    #[test]
    fn update_returns_the_single_row() {
        let resp = normalize(Operation::Update, ok(json!([row(3)]))).unwrap();
        assert_eq!(resp, HandlerResponse::new(StatusCode::OK, row(3)));
    }

    #[test]
    fn update_matching_nothing_is_200_with_null() {
        let resp = normalize(Operation::Update, ok(json!([]))).unwrap();
        assert_eq!(resp, HandlerResponse::new(StatusCode::OK, JsonValue::Null));
    }

    #[test]
    fn delete_counts_removed_rows() {
        let resp = normalize(Operation::Delete, ok(json!([row(5)]))).unwrap();
        assert_eq!(resp.body, json!({ "deleted": 1, "rows": [row(5)] }));

        let resp = normalize(Operation::Delete, ok(json!([]))).unwrap();
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body, json!({ "deleted": 0, "rows": [] }));
    }

    #[test]
    fn upstream_errors_keep_status_and_body() {
        let remote = json!({ "code": "22P02", "message": "invalid input syntax for type bigint" });
        let err = normalize(
            Operation::List,
            Ok(RemoteResponse {
                status: StatusCode::BAD_REQUEST,
                body: remote.to_string(),
            }),
        )
        .unwrap_err();
        let resp = HandlerResponse::from(err);
        assert_eq!(resp, HandlerResponse::new(StatusCode::BAD_REQUEST, remote));
    }

    #[test]
    fn non_json_upstream_error_becomes_500() {
        let err = normalize(
            Operation::Delete,
            Ok(RemoteResponse {
                status: StatusCode::BAD_GATEWAY,
                body: "<html>bad gateway</html>".to_string(),
            }),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        let resp = HandlerResponse::from(err);
        assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.body["error"], "Internal Server Error");
        assert!(resp.body["details"].as_str().unwrap().contains("status 502"));
    }

    #[test]
    fn empty_upstream_error_body_is_relayed_as_null() {
        let err = normalize(
            Operation::List,
            Ok(RemoteResponse {
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: String::new(),
            }),
        )
        .unwrap_err();
        assert_eq!(
            HandlerResponse::from(err),
            HandlerResponse::new(StatusCode::SERVICE_UNAVAILABLE, JsonValue::Null)
        );
    }

    #[test]
    fn malformed_success_bodies_become_500() {
        for body in ["not json", "{\"id\":1}", ""] {
            let err = normalize(
                Operation::List,
                Ok(RemoteResponse {
                    status: StatusCode::OK,
                    body: body.to_string(),
                }),
            )
            .unwrap_err();
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR, "body {:?}", body);
            assert_eq!(err.body()["error"], "Internal Server Error");
        }
    }

    #[test]
    fn transport_failures_carry_the_message() {
        let err = normalize(
            Operation::Create,
            Err(TransportError("connection refused".to_string())),
        )
        .unwrap_err();
        assert_eq!(
            HandlerResponse::from(err).body,
            json!({ "error": "Internal Server Error", "details": "connection refused" })
        );
    }
}
