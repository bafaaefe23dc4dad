use mongodb::bson::{to_document, Bson, Document};
use serde_json::Value;

use crate::db::models::Transaction;
use crate::db::services::RetentionService;
use crate::db::store::{document_to_json, Collection, DocumentStore};
use crate::web::error::AppError;

pub async fn create_transaction(
    retention: &RetentionService,
    transaction: &Transaction,
) -> Result<(), AppError> {
    let document = to_document(transaction)?;
    retention
        .insert_capped(Collection::Transactions, document)
        .await?;
    Ok(())
}

/// Attaches every step recorded for the transaction under a `steps` array.
async fn with_steps(
    store: &dyn DocumentStore,
    mut transaction: Document,
) -> Result<Value, AppError> {
    let transaction_id = transaction.get_str("id").unwrap_or_default().to_string();
    let steps = store
        .find_many(Collection::Steps, "transaction", &transaction_id)
        .await?;
    transaction.insert(
        "steps",
        steps.into_iter().map(Bson::Document).collect::<Vec<_>>(),
    );
    Ok(document_to_json(transaction))
}

pub async fn get_transactions(
    store: &dyn DocumentStore,
    count: u64,
    offset: u64,
) -> Result<Vec<Value>, AppError> {
    let transactions = store
        .find_page(Collection::Transactions, offset, count)
        .await?;
    let mut result = Vec::with_capacity(transactions.len());
    for transaction in transactions {
        result.push(with_steps(store, transaction).await?);
    }
    Ok(result)
}

pub async fn get_transaction(
    store: &dyn DocumentStore,
    transaction_id: &str,
) -> Result<Value, AppError> {
    let transaction = store
        .find_one(Collection::Transactions, "id", transaction_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;
    with_steps(store, transaction).await
}
