use mongodb::bson::Document;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::db::error::StoreError;
use crate::db::store::{Collection, DocumentStore};

/// Size bound of one capped collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetentionPolicy {
    /// Inserting into a collection holding this many documents evicts first.
    pub max_documents: u64,
    /// How many of the oldest documents one eviction removes.
    pub eviction_chunk: u64,
}

impl RetentionPolicy {
    pub const fn new(max_documents: u64, eviction_chunk: u64) -> Self {
        Self {
            max_documents,
            eviction_chunk,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetentionPolicies {
    pub snapshots: RetentionPolicy,
    pub steps: RetentionPolicy,
    pub transactions: RetentionPolicy,
    pub logs: RetentionPolicy,
}

impl Default for RetentionPolicies {
    fn default() -> Self {
        Self {
            snapshots: RetentionPolicy::new(50, 1),
            steps: RetentionPolicy::new(50, 1),
            transactions: RetentionPolicy::new(3, 1),
            logs: RetentionPolicy::new(50, 1),
        }
    }
}

impl RetentionPolicies {
    pub fn for_collection(&self, collection: Collection) -> RetentionPolicy {
        match collection {
            Collection::Snapshots => self.snapshots,
            Collection::Steps => self.steps,
            Collection::Transactions => self.transactions,
            Collection::Logs => self.logs,
        }
    }
}

/// Field deciding which documents are the oldest when a collection is full.
pub fn eviction_sort_key(collection: Collection) -> &'static str {
    match collection {
        Collection::Snapshots | Collection::Steps => "createdAt",
        Collection::Transactions => "start",
        Collection::Logs => "_id",
    }
}

/// Keeps every collection within its [`RetentionPolicy`] while inserting.
pub struct RetentionService {
    store: Arc<dyn DocumentStore>,
    policies: RetentionPolicies,
    write_locks: HashMap<Collection, Mutex<()>>,
}

impl RetentionService {
    pub fn new(store: Arc<dyn DocumentStore>, policies: RetentionPolicies) -> Self {
        let write_locks = Collection::ALL
            .into_iter()
            .map(|collection| (collection, Mutex::new(())))
            .collect();
        Self {
            store,
            policies,
            write_locks,
        }
    }

    pub fn policies(&self) -> &RetentionPolicies {
        &self.policies
    }

    /// Evicts the oldest documents when the collection is full, then inserts `document`.
    /// Returns the number of evicted documents.
    pub async fn insert_capped(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<u64, StoreError> {
        // Count, evict and insert must not interleave with another writer of the same collection.
        let _guard = self.write_locks[&collection].lock().await;

        let policy = self.policies.for_collection(collection);
        let count = self.store.count(collection).await?;
        let mut evicted = 0;
        if count >= policy.max_documents {
            let sort_key = eviction_sort_key(collection);
            evicted = self
                .store
                .delete_oldest(collection, sort_key, policy.eviction_chunk)
                .await?;
            info!(
                collection = %collection,
                count,
                max_documents = policy.max_documents,
                evicted,
                "Collection full, evicted oldest documents."
            );
        }

        self.store.insert(collection, document).await?;
        debug!(collection = %collection, "Document inserted.");
        Ok(evicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_store::MemoryStore;
    use mongodb::bson::doc;

    fn service_with(store: Arc<MemoryStore>, policies: RetentionPolicies) -> RetentionService {
        RetentionService::new(store, policies)
    }

    async fn remaining_ids(store: &MemoryStore, collection: Collection) -> Vec<String> {
        store
            .find_all(collection)
            .await
            .unwrap()
            .iter()
            .map(|doc| doc.get_str("id").unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_default_policies() {
        let policies = RetentionPolicies::default();
        assert_eq!(policies.for_collection(Collection::Transactions), RetentionPolicy::new(3, 1));
        assert_eq!(policies.for_collection(Collection::Snapshots), RetentionPolicy::new(50, 1));
        assert_eq!(policies.for_collection(Collection::Steps), RetentionPolicy::new(50, 1));
        assert_eq!(policies.for_collection(Collection::Logs), RetentionPolicy::new(50, 1));
    }

    #[tokio::test]
    async fn test_transactions_evict_smallest_start() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(store.clone(), RetentionPolicies::default());

        for (id, start) in [("t2", 200_i64), ("t1", 100), ("t3", 300)] {
            let evicted = service
                .insert_capped(Collection::Transactions, doc! { "id": id, "start": start })
                .await
                .unwrap();
            assert_eq!(evicted, 0);
        }

        let evicted = service
            .insert_capped(Collection::Transactions, doc! { "id": "t4", "start": 400_i64 })
            .await
            .unwrap();

        assert_eq!(evicted, 1);
        assert_eq!(
            remaining_ids(&store, Collection::Transactions).await,
            vec!["t2", "t3", "t4"]
        );
    }

    #[tokio::test]
    async fn test_chunk_larger_than_one() {
        let store = Arc::new(MemoryStore::new());
        let policies = RetentionPolicies {
            steps: RetentionPolicy::new(4, 3),
            ..RetentionPolicies::default()
        };
        let service = service_with(store.clone(), policies);

        for created_at in 1..=5_i64 {
            service
                .insert_capped(
                    Collection::Steps,
                    doc! { "id": format!("s{created_at}"), "createdAt": created_at },
                )
                .await
                .unwrap();
        }

        assert_eq!(remaining_ids(&store, Collection::Steps).await, vec!["s4", "s5"]);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_respect_cap() {
        let store = Arc::new(MemoryStore::new());
        let policies = RetentionPolicies {
            logs: RetentionPolicy::new(5, 1),
            ..RetentionPolicies::default()
        };
        let service = Arc::new(service_with(store.clone(), policies));

        let mut handles = Vec::new();
        for i in 0..20 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .insert_capped(Collection::Logs, doc! { "id": format!("l{i}") })
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.count(Collection::Logs).await.unwrap(), 5);
    }
}
