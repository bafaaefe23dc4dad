use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

use crate::db::error::StoreError;
use crate::db::store::{Collection, DocumentStore};

/// In-process store keeping documents in insertion order. Used by tests and `--in-memory` runs.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

// Zero means "no limit", as with the MongoDB driver.
fn limit_or_all(n: u64) -> usize {
    if n == 0 { usize::MAX } else { to_usize(n) }
}

fn field_equals(document: &Document, field: &str, value: &str) -> bool {
    document.get_str(field).map(|v| v == value).unwrap_or(false)
}

// Missing and null sort first, then numbers, strings and ObjectIds.
fn type_rank(value: Option<&Bson>) -> u8 {
    match value {
        None | Some(Bson::Null) => 0,
        Some(Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_)) => 1,
        Some(Bson::String(_)) => 2,
        Some(Bson::ObjectId(_)) => 3,
        Some(_) => 4,
    }
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

fn compare_sort_values(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    match (a, b) {
        (Some(Bson::Int64(x)), Some(Bson::Int64(y))) => x.cmp(y),
        (Some(Bson::String(x)), Some(Bson::String(y))) => x.cmp(y),
        (Some(Bson::ObjectId(x)), Some(Bson::ObjectId(y))) => x.bytes().cmp(&y.bytes()),
        (Some(x), Some(y)) => match (as_f64(x), as_f64(y)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => type_rank(a).cmp(&type_rank(b)),
        },
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn remove_positions(documents: &mut Vec<Document>, doomed: &HashSet<usize>) -> u64 {
    let before = documents.len();
    let mut position = 0;
    documents.retain(|_| {
        let keep = !doomed.contains(&position);
        position += 1;
        keep
    });
    (before - documents.len()) as u64
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn count(&self, collection: Collection) -> Result<u64, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(&collection).map_or(0, |docs| docs.len() as u64))
    }

    async fn insert(&self, collection: Collection, mut document: Document) -> Result<(), StoreError> {
        let id = document
            .remove("_id")
            .unwrap_or_else(|| Bson::ObjectId(ObjectId::new()));
        let mut stored = Document::new();
        stored.insert("_id", id);
        for (key, value) in document {
            stored.insert(key, value);
        }

        let mut collections = self.collections.write().await;
        collections.entry(collection).or_default().push(stored);
        Ok(())
    }

    async fn find_one(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| field_equals(doc, field, value)))
            .cloned())
    }

    async fn find_many(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| field_equals(doc, field, value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_all(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(&collection).cloned().unwrap_or_default())
    }

    async fn find_page(
        &self,
        collection: Collection,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .skip(to_usize(skip))
                    .take(limit_or_all(limit))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete_oldest(
        &self,
        collection: Collection,
        sort_field: &str,
        n: u64,
    ) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(&collection) else {
            return Ok(0);
        };

        let mut order: Vec<usize> = (0..documents.len()).collect();
        // Stable, so ties keep insertion order.
        order.sort_by(|&a, &b| {
            compare_sort_values(documents[a].get(sort_field), documents[b].get(sort_field))
        });
        let doomed: HashSet<usize> = order.into_iter().take(to_usize(n)).collect();
        Ok(remove_positions(documents, &doomed))
    }

    async fn delete_first(&self, collection: Collection, n: u64) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(&collection) else {
            return Ok(0);
        };
        let doomed: HashSet<usize> = (0..documents.len().min(limit_or_all(n))).collect();
        Ok(remove_positions(documents, &doomed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    async fn ids(store: &MemoryStore, collection: Collection) -> Vec<String> {
        store
            .find_all(collection)
            .await
            .unwrap()
            .iter()
            .map(|doc| doc.get_str("id").unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_insert_assigns_object_id_first() {
        let store = MemoryStore::new();
        store
            .insert(Collection::Logs, doc! { "id": "l1" })
            .await
            .unwrap();

        let stored = store.find_one(Collection::Logs, "id", "l1").await.unwrap().unwrap();
        assert!(matches!(stored.get("_id"), Some(Bson::ObjectId(_))));
        assert_eq!(stored.keys().next().map(String::as_str), Some("_id"));
        assert_eq!(store.count(Collection::Logs).await.unwrap(), 1);
        assert_eq!(store.count(Collection::Steps).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_oldest_sorts_by_field() {
        let store = MemoryStore::new();
        for (id, start) in [("b", 20_i64), ("a", 10), ("c", 30)] {
            store
                .insert(Collection::Transactions, doc! { "id": id, "start": start })
                .await
                .unwrap();
        }

        let deleted = store
            .delete_oldest(Collection::Transactions, "start", 2)
            .await
            .unwrap();

        assert_eq!(deleted, 2);
        assert_eq!(ids(&store, Collection::Transactions).await, vec!["c"]);
    }

    #[tokio::test]
    async fn test_delete_oldest_by_object_id_follows_insertion() {
        let store = MemoryStore::new();
        for id in ["l1", "l2", "l3"] {
            store.insert(Collection::Logs, doc! { "id": id }).await.unwrap();
        }

        store.delete_oldest(Collection::Logs, "_id", 1).await.unwrap();

        assert_eq!(ids(&store, Collection::Logs).await, vec!["l2", "l3"]);
    }

    #[tokio::test]
    async fn test_delete_first_and_zero_deletes_all() {
        let store = MemoryStore::new();
        for id in ["s1", "s2", "s3", "s4"] {
            store.insert(Collection::Steps, doc! { "id": id }).await.unwrap();
        }

        assert_eq!(store.delete_first(Collection::Steps, 2).await.unwrap(), 2);
        assert_eq!(ids(&store, Collection::Steps).await, vec!["s3", "s4"]);
        assert_eq!(store.delete_first(Collection::Steps, 0).await.unwrap(), 2);
        assert!(ids(&store, Collection::Steps).await.is_empty());
        assert_eq!(store.delete_first(Collection::Snapshots, 10).await.unwrap(), 0);
        assert_eq!(store.delete_first(Collection::Snapshots, 0).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_page_and_find_many() {
        let store = MemoryStore::new();
        for (id, transaction) in [("s1", "t1"), ("s2", "t2"), ("s3", "t1")] {
            store
                .insert(Collection::Snapshots, doc! { "id": id, "transaction": transaction })
                .await
                .unwrap();
        }

        let page = store.find_page(Collection::Snapshots, 1, 5).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].get_str("id").unwrap(), "s2");
        assert_eq!(store.find_page(Collection::Snapshots, 0, 0).await.unwrap().len(), 3);
        let rest = store.find_page(Collection::Snapshots, 1, 0).await.unwrap();
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[1].get_str("id").unwrap(), "s3");

        let for_t1 = store
            .find_many(Collection::Snapshots, "transaction", "t1")
            .await
            .unwrap();
        assert_eq!(for_t1.len(), 2);
        assert!(store
            .find_one(Collection::Snapshots, "id", "missing")
            .await
            .unwrap()
            .is_none());
    }
}
