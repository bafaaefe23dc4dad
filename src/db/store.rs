use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::db::error::StoreError;

/// The collections backing the monitoring API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Snapshots,
    Steps,
    Transactions,
    Logs,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Snapshots,
        Collection::Steps,
        Collection::Transactions,
        Collection::Logs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Collection::Snapshots => "snapshots",
            Collection::Steps => "steps",
            Collection::Transactions => "transactions",
            Collection::Logs => "logs",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown collection '{0}'")]
pub struct UnknownCollection(pub String);

impl FromStr for Collection {
    type Err = UnknownCollection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|collection| collection.name() == s)
            .ok_or_else(|| UnknownCollection(s.to_string()))
    }
}

/// Document storage used by the HTTP layer.
///
/// "Natural order" is the order the backend returns documents without an explicit sort.
/// For MongoDB that is unspecified but stable in practice. For [`crate::db::MemoryStore`]
/// it is insertion order.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Round-trips to the backend to check that it is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn count(&self, collection: Collection) -> Result<u64, StoreError>;

    /// Inserts a document, assigning an ObjectId `_id` when the document has none.
    async fn insert(&self, collection: Collection, document: Document) -> Result<(), StoreError>;

    /// First document whose string `field` equals `value`.
    async fn find_one(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, StoreError>;

    /// All documents whose string `field` equals `value`, in natural order.
    async fn find_many(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError>;

    async fn find_all(&self, collection: Collection) -> Result<Vec<Document>, StoreError>;

    /// Skips `skip` documents and returns at most `limit`. A `limit` of zero means no limit.
    async fn find_page(
        &self,
        collection: Collection,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Document>, StoreError>;

    /// Deletes the `n` documents with the smallest `sort_field` and returns how many went.
    async fn delete_oldest(
        &self,
        collection: Collection,
        sort_field: &str,
        n: u64,
    ) -> Result<u64, StoreError>;

    /// Deletes the first `n` documents in natural order. Zero deletes every document.
    async fn delete_first(&self, collection: Collection, n: u64) -> Result<u64, StoreError>;
}

/// Converts a stored document to the JSON served to clients. ObjectIds become their hex string.
pub fn document_to_json(document: Document) -> Value {
    Value::Object(
        document
            .into_iter()
            .map(|(key, value)| (key, bson_to_json(value)))
            .collect(),
    )
}

pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::Document(document) => document_to_json(document),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId};
    use serde_json::json;

    #[test]
    fn test_collection_names_round_trip() {
        for collection in Collection::ALL {
            assert_eq!(collection.name().parse::<Collection>(), Ok(collection));
        }
        assert_eq!(
            "Snapshots".parse::<Collection>(),
            Err(UnknownCollection("Snapshots".to_string()))
        );
        let err = "users".parse::<Collection>().unwrap_err();
        assert_eq!(err.to_string(), "unknown collection 'users'");
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_object_ids_become_hex_strings_at_any_depth() {
        let outer = ObjectId::new();
        let inner = ObjectId::new();
        let document = doc! {
            "_id": outer,
            "id": "t1",
            "start": 10_i64,
            "steps": [ { "_id": inner, "topic": "orders" } ],
            "nested": { "ref": inner },
        };

        let value = document_to_json(document);

        assert_eq!(value["_id"], json!(outer.to_hex()));
        assert_eq!(value["steps"][0]["_id"], json!(inner.to_hex()));
        assert_eq!(value["nested"]["ref"], json!(inner.to_hex()));
        assert_eq!(value["start"], json!(10));
        assert_eq!(value["steps"][0]["topic"], json!("orders"));
    }
}
