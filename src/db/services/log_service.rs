use mongodb::bson::to_document;
use serde_json::Value;

use crate::db::models::Log;
use crate::db::services::{find_by_id, RetentionService};
use crate::db::store::{Collection, DocumentStore};
use crate::web::error::AppError;

pub async fn create_log(retention: &RetentionService, log: &Log) -> Result<(), AppError> {
    let document = to_document(log)?;
    retention.insert_capped(Collection::Logs, document).await?;
    Ok(())
}

pub async fn get_log(store: &dyn DocumentStore, log_id: &str) -> Result<Value, AppError> {
    find_by_id(store, Collection::Logs, log_id, "Log not found").await
}
