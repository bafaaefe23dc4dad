use crate::db::{models::Step, services::step_service};
use crate::web::{error::AppError, extract::AppJson, AppState};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

async fn create_step_handler(
    State(app_state): State<Arc<AppState>>,
    AppJson(payload): AppJson<Step>,
) -> Result<Json<Value>, AppError> {
    step_service::create_step(&app_state.retention, &payload).await?;
    Ok(Json(json!({ "message": "Step saved", "step": payload })))
}

async fn get_step_handler(
    State(app_state): State<Arc<AppState>>,
    Path(step_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let step = step_service::get_step(app_state.store.as_ref(), &step_id).await?;
    Ok(Json(step))
}

pub fn create_step_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/steps", post(create_step_handler))
        .route("/steps/{step_id}", get(get_step_handler))
}
