use tracing::info;

use crate::db::store::{Collection, DocumentStore};
use crate::web::error::AppError;

/// Deletes the first `number_of_entries` documents of `collection_name`, or all of them
/// when `number_of_entries` is zero. Returns the user-facing summary message.
pub async fn delete_entries(
    store: &dyn DocumentStore,
    collection_name: &str,
    number_of_entries: u64,
) -> Result<String, AppError> {
    let collection: Collection = collection_name
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid collection name".to_string()))?;

    let deleted = store.delete_first(collection, number_of_entries).await?;
    info!(
        collection = %collection,
        requested = number_of_entries,
        deleted,
        "Manually deleted entries."
    );
    Ok(format!("{deleted} entries deleted from {collection} collection"))
}
