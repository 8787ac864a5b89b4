// Responsible for all communication with the remote data-API.

use super::{DataApi, RemoteCall, RemoteResponse, TransportError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// [`DataApi`] backed by a shared `reqwest` connection pool.
#[derive(Clone)]
pub struct RestDataApi {
    client: reqwest::Client,
}

impl RestDataApi {
    /// `timeout` bounds each call end to end. `None` leaves calls unbounded.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DataApi for RestDataApi {
    async fn execute(&self, call: RemoteCall) -> Result<RemoteResponse, TransportError> {
        let url = call.url();
        debug!(method = %call.method, path = %call.path, "calling data store");

        let mut request = self
            .client
            .request(call.method.clone(), &url)
            .headers(call.headers);
        if let Some(body) = &call.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            TransportError(format!("{} {} failed: {}", call.method, call.path, e))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            TransportError(format!(
                "Failed to read response body of {} {}: {}",
                call.method, call.path, e
            ))
        })?;

        debug!(method = %call.method, path = %call.path, status = status.as_u16(), "data store replied");
        Ok(RemoteResponse { status, body })
    }
}
