use crate::db::{
    models::Transaction,
    services::{snapshot_service, transaction_service},
};
use crate::web::{error::AppError, extract::{AppJson, AppQuery}, AppState};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct TransactionPageQuery {
    #[serde(default = "default_count")]
    count: u64,
    #[serde(default)]
    offset: u64,
}

fn default_count() -> u64 {
    10
}

async fn create_transaction_handler(
    State(app_state): State<Arc<AppState>>,
    AppJson(payload): AppJson<Transaction>,
) -> Result<Json<Value>, AppError> {
    transaction_service::create_transaction(&app_state.retention, &payload).await?;
    Ok(Json(json!({ "message": "Transaction saved", "transaction": payload })))
}

async fn get_transactions_handler(
    State(app_state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<TransactionPageQuery>,
) -> Result<Json<Vec<Value>>, AppError> {
    let transactions =
        transaction_service::get_transactions(app_state.store.as_ref(), query.count, query.offset)
            .await?;
    Ok(Json(transactions))
}

async fn get_transaction_handler(
    State(app_state): State<Arc<AppState>>,
    Path(transaction_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let transaction =
        transaction_service::get_transaction(app_state.store.as_ref(), &transaction_id).await?;
    Ok(Json(transaction))
}

async fn get_transaction_snapshots_handler(
    State(app_state): State<Arc<AppState>>,
    Path(transaction_id): Path<String>,
) -> Result<Json<Vec<Value>>, AppError> {
    let snapshots =
        snapshot_service::get_snapshots_for_transaction(app_state.store.as_ref(), &transaction_id)
            .await?;
    Ok(Json(snapshots))
}

pub fn create_transaction_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/transactions",
            get(get_transactions_handler).post(create_transaction_handler),
        )
        .route("/transactions/{transaction_id}", get(get_transaction_handler))
        .route(
            "/transactions/{transaction_id}/snapshots",
            get(get_transaction_snapshots_handler),
        )
}
