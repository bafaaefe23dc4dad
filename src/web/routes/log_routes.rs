use crate::db::{models::Log, services::log_service};
use crate::web::{error::AppError, extract::AppJson, AppState};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

async fn create_log_handler(
    State(app_state): State<Arc<AppState>>,
    AppJson(payload): AppJson<Log>,
) -> Result<Json<Value>, AppError> {
    log_service::create_log(&app_state.retention, &payload).await?;
    Ok(Json(json!({ "message": "Log saved", "log": payload })))
}

async fn get_log_handler(
    State(app_state): State<Arc<AppState>>,
    Path(log_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let log = log_service::get_log(app_state.store.as_ref(), &log_id).await?;
    Ok(Json(log))
}

pub fn create_log_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/logs", post(create_log_handler))
        .route("/logs/{log_id}", get(get_log_handler))
}
