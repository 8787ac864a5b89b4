//! Wire-level view of the remote REST data-API.
//!
//! [`RemoteCall`] is what the request mapper produces; a [`DataApi`] turns it into a
//! [`RemoteResponse`] or a [`TransportError`]. The seam is a trait so the orchestrator
//! can run against an in-memory store in tests.

use async_trait::async_trait;
use axum::http::{HeaderMap, Method, StatusCode};
use serde_json::Value as JsonValue;
use thiserror::Error;

pub mod client;

pub use client::RestDataApi;

/// A fully described request against the data-API.
#[derive(Debug, Clone)]
pub struct RemoteCall {
    pub method: Method,
    /// Store base address, without a trailing slash.
    pub base_url: String,
    /// Path plus query, e.g. `/rest/v1/potatoes?id=eq.3`.
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<JsonValue>,
}

impl RemoteCall {
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }
}

/// Raw outcome of a call that reached the store. The body is left undecoded; deciding
/// what it means is the response normalizer's job.
#[derive(Debug, Clone)]
pub struct RemoteResponse {
    pub status: StatusCode,
    pub body: String,
}

/// The call never produced a response (connect/timeout/body read failure).
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

#[async_trait]
pub trait DataApi: Send + Sync {
    /// Issues exactly one request. Implementations must not retry.
    async fn execute(&self, call: RemoteCall) -> Result<RemoteResponse, TransportError>;
}
