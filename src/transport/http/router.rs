use crate::app::error::ErrorBody;
use crate::app::response_normalizer::DeleteSummary;
use crate::domain::record::{CreatePotatoRequest, Potato, UpdatePotatoRequest};
use crate::transport::http::handlers::{health, potatoes};
use crate::transport::http::types::HealthResponse;
use axum::routing::{any, get};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        potatoes::create_potato_handler,
        potatoes::list_potatoes_handler,
        potatoes::update_potato_handler,
        potatoes::delete_potato_handler
    ),
    components(schemas(
        Potato,
        CreatePotatoRequest,
        UpdatePotatoRequest,
        DeleteSummary,
        ErrorBody,
        HealthResponse
    ))
)]
#[allow(dead_code)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/api/potatoes/create", any(potatoes::create_potato_handler))
        .route("/api/potatoes/list", any(potatoes::list_potatoes_handler))
        .route("/api/potatoes/update", any(potatoes::update_potato_handler))
        .route("/api/potatoes/delete", any(potatoes::delete_potato_handler))
        .with_state(app_state)
}
