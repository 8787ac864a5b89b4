// src/bin/api_server.rs

use potato_inventory::transport;
use potato_inventory::{PotatoService, RestDataApi, ServerConfig, StoreConfig};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "potato_inventory=info,api_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration (read once, shared read-only afterwards) ---
    let server_config = ServerConfig::from_env()?;
    let store_config = Arc::new(StoreConfig::from_env());
    match store_config.credentials() {
        Ok(creds) => info!(base_url = creds.base_url, table = creds.table, "Data store configured"),
        Err(e) => warn!(
            error = %e,
            "Data store is not configured; potato endpoints will answer 500 until it is"
        ),
    }

    // --- Service Initialization ---
    let data_api = RestDataApi::new(server_config.store_timeout)?;
    let potato_service = PotatoService::new(store_config, Arc::new(data_api));
    let app_state = transport::http::AppState::new(potato_service);

    // --- API Server Initialization ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&server_config.bind_addr).await?;
    info!("API server listening on http://{}", listener.local_addr()?);
    info!("Swagger UI available at /swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received, draining in-flight requests");
            }
        })
        .await?;

    info!("Graceful shutdown complete.");
    Ok(())
}
