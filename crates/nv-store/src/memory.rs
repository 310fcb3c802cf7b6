//! In-memory backend
use crate::StorageAdapter;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

type Collection = IndexMap<String, Value>;

/// Process-local store. Collections are created on first access.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageAdapter for MemoryStore {
    async fn read(&self, collection: &str, id: &str) -> Option<Value> {
        self.collections
            .read()
            .await
            .get(collection)
            .and_then(|c| c.get(id))
            .cloned()
    }

    async fn write(&self, collection: &str, id: &str, value: Value) {
        let mut guard = self.collections.write().await;
        guard
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), value);
        tracing::debug!(collection, id, "store write");
    }

    async fn list(&self, collection: &str) -> Vec<Value> {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|c| c.values().cloned().collect())
            .unwrap_or_default()
    }

    async fn delete(&self, collection: &str, id: &str) -> bool {
        let mut guard = self.collections.write().await;
        guard
            .entry(collection.to_string())
            .or_default()
            .shift_remove(id)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insertion_order_survives_upsert() {
        let store = MemoryStore::new();
        store.write("c", "b", json!(1)).await;
        store.write("c", "a", json!(2)).await;
        store.write("c", "b", json!(3)).await;

        assert_eq!(store.list("c").await, vec![json!(3), json!(2)]);
        assert_eq!(store.read("c", "b").await, Some(json!(3)));
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let store = MemoryStore::new();
        store.write("c", "x", json!({"v": 1})).await;
        store.write("c", "y", json!({"v": 2})).await;
        store.write("c", "z", json!({"v": 3})).await;

        assert!(store.delete("c", "y").await);
        assert!(!store.delete("c", "y").await);
        assert!(!store.delete("other", "y").await);
        assert_eq!(store.list("c").await, vec![json!({"v": 1}), json!({"v": 3})]);
    }

    #[tokio::test]
    async fn test_collections_are_independent() {
        let store = MemoryStore::new();
        store.write("products", "id-1", json!("product")).await;
        store.write("jobs", "id-1", json!("job")).await;

        assert_eq!(store.read("products", "id-1").await, Some(json!("product")));
        assert_eq!(store.read("jobs", "id-1").await, Some(json!("job")));
        assert!(store.list("never-used").await.is_empty());
        assert_eq!(store.list("jobs").await.len(), 1);
    }
}
