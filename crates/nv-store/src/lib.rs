//! Neural Vision Store: multi-collection key-value storage
//!
//! Collections are independent namespaces of JSON documents keyed by id.
//! The only backend today is [`MemoryStore`]; everything is lost on restart.
//!
//! # Example
//!
//! ```ignore
//! use nv_store::{MemoryStore, StorageAdapter, read_as, write_as};
//!
//! let store = MemoryStore::new();
//! write_as(&store, "products", "g-1", &product).await?;
//! let back: Option<SellerProduct> = read_as(&store, "products", "g-1").await?;
//! ```

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Collection holding seller products, keyed by garment id
pub const PRODUCTS: &str = "products";
/// Collection holding portal-submitted jobs, keyed by job id
pub const JOBS: &str = "jobs";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("STORE/ENCODE {collection}/{id}: {source}")]
    Encode {
        collection: String,
        id: String,
        source: serde_json::Error,
    },

    #[error("STORE/DECODE {collection}: {source}")]
    Decode {
        collection: String,
        source: serde_json::Error,
    },
}

/// Storage contract. A durable backend only has to implement these four calls.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    async fn read(&self, collection: &str, id: &str) -> Option<Value>;

    /// Upsert. Replacing an id keeps its original position in `list`.
    async fn write(&self, collection: &str, id: &str, value: Value);

    /// All values in insertion order.
    async fn list(&self, collection: &str) -> Vec<Value>;

    /// Returns whether an entry existed.
    async fn delete(&self, collection: &str, id: &str) -> bool;
}

pub async fn read_as<T: DeserializeOwned>(
    store: &dyn StorageAdapter,
    collection: &str,
    id: &str,
) -> Result<Option<T>, StoreError> {
    match store.read(collection, id).await {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|source| StoreError::Decode {
                collection: collection.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

pub async fn write_as<T: Serialize>(
    store: &dyn StorageAdapter,
    collection: &str,
    id: &str,
    value: &T,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(value).map_err(|source| StoreError::Encode {
        collection: collection.to_string(),
        id: id.to_string(),
        source,
    })?;
    store.write(collection, id, value).await;
    Ok(())
}

pub async fn list_as<T: DeserializeOwned>(
    store: &dyn StorageAdapter,
    collection: &str,
) -> Result<Vec<T>, StoreError> {
    store
        .list(collection)
        .await
        .into_iter()
        .map(|value| {
            serde_json::from_value(value).map_err(|source| StoreError::Decode {
                collection: collection.to_string(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        body: String,
    }

    #[tokio::test]
    async fn test_typed_roundtrip() {
        let store = MemoryStore::new();
        let note = Note {
            id: "n1".to_string(),
            body: "hello".to_string(),
        };

        write_as(&store, "notes", "n1", &note).await.unwrap();
        let back: Option<Note> = read_as(&store, "notes", "n1").await.unwrap();
        assert_eq!(back, Some(note));

        let missing: Option<Note> = read_as(&store, "notes", "nope").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_decode_error_is_reported() {
        let store = MemoryStore::new();
        store.write("notes", "bad", serde_json::json!(42)).await;

        let result: Result<Vec<Note>, _> = list_as(&store, "notes").await;
        assert!(matches!(result, Err(StoreError::Decode { .. })));
    }
}
