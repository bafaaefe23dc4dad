pub mod log_service;
pub mod maintenance_service;
pub mod retention_service;
pub mod snapshot_service;
pub mod step_service;
pub mod transaction_service;

pub use retention_service::{RetentionPolicies, RetentionPolicy, RetentionService};

use serde_json::Value;

use crate::db::store::{document_to_json, Collection, DocumentStore};
use crate::web::error::AppError;

/// Looks a document up by its `id` field, turning a miss into a 404 carrying `not_found`.
pub(crate) async fn find_by_id(
    store: &dyn DocumentStore,
    collection: Collection,
    id: &str,
    not_found: &str,
) -> Result<Value, AppError> {
    store
        .find_one(collection, "id", id)
        .await?
        .map(document_to_json)
        .ok_or_else(|| AppError::NotFound(not_found.to_string()))
}
