//! Error taxonomy for the potato operations and its mapping to HTTP.

use crate::domain::FieldTag;
use crate::infra::config::ConfigError;
use crate::infra::data_api::TransportError;
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value as JsonValue;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type for the potato operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<FieldTag>),

    #[error("missing id")]
    MissingIdentifier,

    #[error("invalid id: {0}")]
    InvalidIdentifier(String),

    #[error("invalid JSON body: {0}")]
    MalformedBody(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("transport error: {0}")]
    Transport(String),

    // ==================
    // Relayed from the store
    // ==================
    /// Non-success answer from the data store, relayed verbatim.
    #[error("data store answered {status}")]
    Upstream { status: StatusCode, body: JsonValue },
}

/// Body of every locally generated error response.
#[derive(Serialize, Debug, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub details: Option<JsonValue>,
}

impl ErrorBody {
    fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
            details: None,
        }
    }

    fn with_details(error: &str, details: impl Into<JsonValue>) -> Self {
        Self {
            error: error.to_string(),
            details: Some(details.into()),
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::Transport(err.0)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingIdentifier => StatusCode::BAD_REQUEST,
            ApiError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            ApiError::MalformedBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream { status, .. } => *status,
        }
    }

    /// Response body for this error. Upstream bodies are passed through untouched.
    pub fn body(&self) -> JsonValue {
        let body = match self {
            ApiError::Upstream { body, .. } => return body.clone(),
            ApiError::MethodNotAllowed => ErrorBody::new("method not allowed"),
            ApiError::Validation(tags) => ErrorBody::with_details("validation failed", tags.clone()),
            ApiError::MissingIdentifier => ErrorBody::new("missing id"),
            ApiError::InvalidIdentifier(raw) => ErrorBody::with_details("invalid id", raw.as_str()),
            ApiError::MalformedBody(msg) => ErrorBody::with_details("invalid JSON body", msg.as_str()),
            ApiError::Configuration(e) => ErrorBody::with_details("configuration error", e.to_string()),
            ApiError::Transport(msg) => ErrorBody::with_details("Internal Server Error", msg.as_str()),
        };
        serde_json::to_value(body).unwrap_or_else(|_| JsonValue::Null)
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::Configuration(_) | ApiError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn local_errors_render_uniform_bodies() {
        assert_eq!(ApiError::MissingIdentifier.body(), json!({ "error": "missing id" }));
        assert_eq!(
            ApiError::Validation(vec!["quantity", "name"]).body(),
            json!({ "error": "validation failed", "details": ["quantity", "name"] })
        );
        assert_eq!(ApiError::MethodNotAllowed.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            ApiError::Transport("connection refused".into()).body(),
            json!({ "error": "Internal Server Error", "details": "connection refused" })
        );
    }

    #[test]
    fn upstream_errors_are_relayed_verbatim() {
        let remote = json!({ "code": "23505", "message": "duplicate key", "details": null, "hint": null });
        let err = ApiError::Upstream {
            status: StatusCode::CONFLICT,
            body: remote.clone(),
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.body(), remote);
        assert!(!err.is_server_error());
    }

    #[test]
    fn configuration_errors_are_server_errors() {
        let err = ApiError::from(ConfigError::Missing("SUPABASE_URL"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body()["details"], "SUPABASE_URL must be set");
        assert!(err.is_server_error());
    }
}
