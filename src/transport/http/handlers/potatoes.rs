//! The four potato endpoints.
//!
//! Each route accepts every method so that a wrong verb reaches the service and gets the
//! uniform 405 body instead of the router's empty one.

use crate::app::{HandlerResponse, InboundRequest};
use crate::transport::http::types::AppState;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::Method;
use std::collections::HashMap;

#[utoipa::path(
    post,
    path = "/api/potatoes/create",
    request_body = crate::domain::record::CreatePotatoRequest,
    responses(
        (status = 201, description = "Record created", body = crate::domain::Potato),
        (status = 400, description = "One or more fields are invalid", body = crate::app::error::ErrorBody),
        (status = 405, description = "Method not allowed", body = crate::app::error::ErrorBody),
        (status = 422, description = "Body is not a JSON object", body = crate::app::error::ErrorBody),
        (status = 500, description = "Store not configured or unreachable", body = crate::app::error::ErrorBody)
    )
)]
pub async fn create_potato_handler(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> HandlerResponse {
    state.potato_service.create(InboundRequest { method, query, body }).await
}

#[utoipa::path(
    get,
    path = "/api/potatoes/list",
    responses(
        (status = 200, description = "All records", body = Vec<crate::domain::Potato>),
        (status = 405, description = "Method not allowed", body = crate::app::error::ErrorBody),
        (status = 500, description = "Store not configured or unreachable", body = crate::app::error::ErrorBody)
    )
)]
pub async fn list_potatoes_handler(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> HandlerResponse {
    state.potato_service.list(InboundRequest { method, query, body }).await
}

#[utoipa::path(
    patch,
    path = "/api/potatoes/update",
    params(
        ("id" = i64, Query, description = "Id of the record to update")
    ),
    request_body = crate::domain::record::UpdatePotatoRequest,
    responses(
        (status = 200, description = "Updated record, or null if the id matched nothing", body = crate::domain::Potato),
        (status = 400, description = "Missing id, invalid fields or no fields at all", body = crate::app::error::ErrorBody),
        (status = 405, description = "Method not allowed", body = crate::app::error::ErrorBody),
        (status = 422, description = "Body is not a JSON object", body = crate::app::error::ErrorBody),
        (status = 500, description = "Store not configured or unreachable", body = crate::app::error::ErrorBody)
    )
)]
pub async fn update_potato_handler(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> HandlerResponse {
    state.potato_service.update(InboundRequest { method, query, body }).await
}

#[utoipa::path(
    delete,
    path = "/api/potatoes/delete",
    params(
        ("id" = i64, Query, description = "Id of the record to delete")
    ),
    responses(
        (status = 200, description = "Removed rows (deleted = 0 if the id matched nothing)", body = crate::app::response_normalizer::DeleteSummary),
        (status = 400, description = "Missing or invalid id", body = crate::app::error::ErrorBody),
        (status = 405, description = "Method not allowed", body = crate::app::error::ErrorBody),
        (status = 500, description = "Store not configured or unreachable", body = crate::app::error::ErrorBody)
    )
)]
pub async fn delete_potato_handler(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> HandlerResponse {
    state.potato_service.delete(InboundRequest { method, query, body }).await
}
