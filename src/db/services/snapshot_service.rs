use mongodb::bson::to_document;
use serde_json::Value;

use crate::db::models::Snapshot;
use crate::db::services::{find_by_id, RetentionService};
use crate::db::store::{document_to_json, Collection, DocumentStore};
use crate::web::error::AppError;

pub async fn create_snapshot(
    retention: &RetentionService,
    snapshot: &Snapshot,
) -> Result<(), AppError> {
    let document = to_document(snapshot)?;
    retention.insert_capped(Collection::Snapshots, document).await?;
    Ok(())
}

pub async fn get_all_snapshots(store: &dyn DocumentStore) -> Result<Vec<Value>, AppError> {
    let snapshots = store.find_all(Collection::Snapshots).await?;
    Ok(snapshots.into_iter().map(document_to_json).collect())
}

pub async fn get_snapshot(store: &dyn DocumentStore, snapshot_id: &str) -> Result<Value, AppError> {
    find_by_id(store, Collection::Snapshots, snapshot_id, "Snapshot not found").await
}

pub async fn get_snapshots_for_transaction(
    store: &dyn DocumentStore,
    transaction_id: &str,
) -> Result<Vec<Value>, AppError> {
    let snapshots = store
        .find_many(Collection::Snapshots, "transaction", transaction_id)
        .await?;
    if snapshots.is_empty() {
        return Err(AppError::NotFound(
            "No snapshots found for this transaction".to_string(),
        ));
    }
    Ok(snapshots.into_iter().map(document_to_json).collect())
}
