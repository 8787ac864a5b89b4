use crate::app::{HandlerResponse, PotatoService};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub potato_service: Arc<PotatoService>,
}

impl AppState {
    pub fn new(potato_service: PotatoService) -> Self {
        Self {
            potato_service: Arc::new(potato_service),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// False when the data store URL or key is missing; store-bound routes answer 500.
    pub store_configured: bool,
}

impl IntoResponse for HandlerResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
