use crate::transport::http::types::{AppState, HealthResponse};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store_configured = state.potato_service.config().is_configured();
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            store_configured,
        }),
    )
}
