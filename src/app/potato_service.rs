//! The potato service.
//!
//! One entry point per operation. Each runs the same pipeline:
//! method check → parse body → read id → validate → map → call the store → normalize.
//! Any step can end the request early with an error response, and no step after the
//! remote call can trigger another one.

use super::error::{ApiError, ApiResult};
use super::request_mapper::{map_request, Operation, StoreRequest};
use super::response_normalizer::{normalize, HandlerResponse};
use crate::domain::{validate_create, validate_partial};
use crate::infra::config::StoreConfig;
use crate::infra::data_api::DataApi;
use axum::body::Bytes;
use axum::http::Method;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};

/// An inbound request, reduced to what the pipeline looks at.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub query: HashMap<String, String>,
    pub body: Bytes,
}

impl InboundRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            query: HashMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.query.insert("id".to_string(), id.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

/// Stateless per request; the config and the store client are shared read-only.
pub struct PotatoService {
    config: Arc<StoreConfig>,
    data_api: Arc<dyn DataApi>,
}

impl PotatoService {
    pub fn new(config: Arc<StoreConfig>, data_api: Arc<dyn DataApi>) -> Self {
        Self { config, data_api }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub async fn create(&self, request: InboundRequest) -> HandlerResponse {
        self.handle(Operation::Create, request).await
    }

    pub async fn list(&self, request: InboundRequest) -> HandlerResponse {
        self.handle(Operation::List, request).await
    }

    pub async fn update(&self, request: InboundRequest) -> HandlerResponse {
        self.handle(Operation::Update, request).await
    }

    pub async fn delete(&self, request: InboundRequest) -> HandlerResponse {
        self.handle(Operation::Delete, request).await
    }

    pub async fn handle(&self, operation: Operation, request: InboundRequest) -> HandlerResponse {
        match self.run(operation, &request).await {
            Ok(response) => {
                info!(operation = operation.name(), status = response.status.as_u16(), "request handled");
                response
            }
            Err(err) => {
                let status = err.status_code().as_u16();
                if err.is_server_error() {
                    error!(operation = operation.name(), status, error = %err, "request failed");
                } else {
                    warn!(operation = operation.name(), status, error = %err, "request rejected");
                }
                HandlerResponse::from(err)
            }
        }
    }

    async fn run(&self, operation: Operation, request: &InboundRequest) -> ApiResult<HandlerResponse> {
        if request.method != operation.method() {
            return Err(ApiError::MethodNotAllowed);
        }

        let store_request = match operation {
            Operation::Create => {
                let body = parse_body(&request.body)?;
                StoreRequest::Create(validate_create(&body).map_err(ApiError::Validation)?)
            }
            Operation::List => StoreRequest::List,
            Operation::Update => {
                let body = parse_body(&request.body)?;
                let id = require_id(&request.query)?;
                let patch = validate_partial(&body).map_err(ApiError::Validation)?;
                StoreRequest::Update { id, patch }
            }
            Operation::Delete => StoreRequest::Delete {
                id: require_id(&request.query)?,
            },
        };

        let call = map_request(&self.config, &store_request)?;
        let outcome = self.data_api.execute(call).await;
        normalize(operation, outcome)
    }
}

/// An empty or whitespace-only body reads as `{}`.
fn parse_body(raw: &[u8]) -> ApiResult<JsonValue> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(JsonValue::Object(Default::default()));
    }
    let body: JsonValue =
        serde_json::from_slice(raw).map_err(|e| ApiError::MalformedBody(e.to_string()))?;
    if !body.is_object() {
        return Err(ApiError::MalformedBody("expected a JSON object".to_string()));
    }
    Ok(body)
}

/// The selector comes from the query string only, never from the body.
fn require_id(query: &HashMap<String, String>) -> ApiResult<i64> {
    let raw = query
        .get("id")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::MissingIdentifier)?;
    raw.parse::<i64>()
        .map_err(|_| ApiError::InvalidIdentifier(raw.to_string()))
}
