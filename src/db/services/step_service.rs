use mongodb::bson::to_document;
use serde_json::Value;

use crate::db::models::Step;
use crate::db::services::{find_by_id, RetentionService};
use crate::db::store::{Collection, DocumentStore};
use crate::web::error::AppError;

pub async fn create_step(retention: &RetentionService, step: &Step) -> Result<(), AppError> {
    let document = to_document(step)?;
    retention.insert_capped(Collection::Steps, document).await?;
    Ok(())
}

pub async fn get_step(store: &dyn DocumentStore, step_id: &str) -> Result<Value, AppError> {
    find_by_id(store, Collection::Steps, step_id, "Step not found").await
}
