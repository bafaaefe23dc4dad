use crate::db::{models::Snapshot, services::snapshot_service};
use crate::web::{error::AppError, extract::AppJson, AppState};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

async fn create_snapshot_handler(
    State(app_state): State<Arc<AppState>>,
    AppJson(payload): AppJson<Snapshot>,
) -> Result<Json<Value>, AppError> {
    snapshot_service::create_snapshot(&app_state.retention, &payload).await?;
    Ok(Json(json!({ "message": "Snapshot saved", "snapshot": payload })))
}

async fn get_all_snapshots_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<Value>>, AppError> {
    let snapshots = snapshot_service::get_all_snapshots(app_state.store.as_ref()).await?;
    Ok(Json(snapshots))
}

async fn get_snapshot_handler(
    State(app_state): State<Arc<AppState>>,
    Path(snapshot_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let snapshot = snapshot_service::get_snapshot(app_state.store.as_ref(), &snapshot_id).await?;
    Ok(Json(snapshot))
}

pub fn create_snapshot_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/snapshots",
            get(get_all_snapshots_handler).post(create_snapshot_handler),
        )
        .route("/snapshots/{snapshot_id}", get(get_snapshot_handler))
}
