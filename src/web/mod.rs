use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::db::services::{RetentionPolicies, RetentionService};
use crate::db::DocumentStore;
use crate::server::config::ServerConfig;
use crate::version::VERSION;
use crate::web::routes::*;

pub mod cors;
pub mod error;
pub mod extract;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub retention: Arc<RetentionService>,
}

async fn status_handler() -> Json<&'static str> {
    Json("Connected to API")
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    database: &'static str,
    retention: RetentionPolicies,
}

async fn health_check_handler(
    State(app_state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let (status_code, status, database) = match app_state.store.ping().await {
        Ok(()) => (StatusCode::OK, "ok", "up"),
        Err(e) => {
            warn!(error = %e, "Health check could not reach the database.");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "down")
        }
    };
    (
        status_code,
        Json(HealthResponse {
            status,
            version: VERSION,
            database,
            retention: *app_state.retention.policies(),
        }),
    )
}

pub fn create_axum_router(store: Arc<dyn DocumentStore>, config: &ServerConfig) -> Router {
    let retention = Arc::new(RetentionService::new(store.clone(), config.retention));
    let cors = cors::create_cors_layer(config.monitoring_url.as_deref());

    let app_state = Arc::new(AppState { store, retention });

    Router::new()
        .route("/status", get(status_handler))
        .route("/health", get(health_check_handler))
        .merge(snapshot_routes::create_snapshot_router())
        .merge(step_routes::create_step_router())
        .merge(transaction_routes::create_transaction_router())
        .merge(log_routes::create_log_router())
        .merge(maintenance_routes::create_maintenance_router())
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
