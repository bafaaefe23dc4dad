use crate::db::services::maintenance_service;
use crate::web::{error::AppError, extract::AppQuery, AppState};
use axum::{
    extract::State,
    routing::delete,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct DeleteEntriesQuery {
    number_of_entries: u64,
    collection_name: String,
}

async fn delete_entries_handler(
    State(app_state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<DeleteEntriesQuery>,
) -> Result<Json<Value>, AppError> {
    let message = maintenance_service::delete_entries(
        app_state.store.as_ref(),
        &query.collection_name,
        query.number_of_entries,
    )
    .await?;
    Ok(Json(json!({ "message": message })))
}

pub fn create_maintenance_router() -> Router<Arc<AppState>> {
    Router::new().route("/delete", delete(delete_entries_handler))
}
