//! In-memory cache storage.
//!
//! Implements the same open/names/delete and lookup/put contract as the
//! disk store, backed by maps. Used by tests and by embedders that want the
//! cache logic without persistence.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::CacheError;
use crate::models::{Request, Response};

use super::{CacheStorage, CacheStore, StoredEntry};

#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, StoredEntry>>,
}

impl MemoryStore {
    fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn lookup(&self, request: &Request) -> Result<Option<Response>, CacheError> {
        let entries = self.entries.read().unwrap();
        Ok(entries.get(&request.cache_key()).map(|e| e.response.clone()))
    }

    async fn put(&self, request: &Request, response: Response) -> Result<(), CacheError> {
        let mut entries = self.entries.write().unwrap();
        entries.insert(
            request.cache_key(),
            StoredEntry::new(request.clone(), response),
        );
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<Request>, CacheError> {
        let entries = self.entries.read().unwrap();
        Ok(entries.values().map(|e| e.request.clone()).collect())
    }

    async fn entries(&self) -> Result<Vec<StoredEntry>, CacheError> {
        let entries = self.entries.read().unwrap();
        Ok(entries.values().cloned().collect())
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    stores: RwLock<HashMap<String, Arc<MemoryStore>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for MemoryStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheStore>, CacheError> {
        let mut stores = self.stores.write().unwrap();
        let store = stores
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MemoryStore::new()));
        Ok(Arc::clone(store) as Arc<dyn CacheStore>)
    }

    async fn names(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.stores.read().unwrap().keys().cloned().collect())
    }

    async fn delete(&self, name: &str) -> Result<bool, CacheError> {
        Ok(self.stores.write().unwrap().remove(name).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResponseKind;
    use bytes::Bytes;

    fn response(body: &'static [u8]) -> Response {
        Response::new(
            200,
            ResponseKind::Basic,
            "https://app.example.com/a",
            Bytes::from_static(body),
        )
    }

    #[tokio::test]
    async fn test_open_creates_store() {
        let storage = MemoryStorage::new();
        assert!(storage.names().await.unwrap().is_empty());
        storage.open("go-budgeting-v1.0.1").await.unwrap();
        assert_eq!(storage.names().await.unwrap(), vec!["go-budgeting-v1.0.1"]);
    }

    #[tokio::test]
    async fn test_put_then_lookup() {
        let storage = MemoryStorage::new();
        let store = storage.open("v1").await.unwrap();
        let req = Request::get("https://app.example.com/a");

        assert!(store.lookup(&req).await.unwrap().is_none());
        store.put(&req, response(b"hello")).await.unwrap();

        let hit = store.lookup(&req).await.unwrap().unwrap();
        assert_eq!(hit.body, Bytes::from_static(b"hello"));
    }

    #[tokio::test]
    async fn test_put_is_last_write_wins() {
        let storage = MemoryStorage::new();
        let store = storage.open("v1").await.unwrap();
        let req = Request::get("https://app.example.com/a");

        store.put(&req, response(b"one")).await.unwrap();
        store.put(&req, response(b"two")).await.unwrap();

        assert_eq!(store.keys().await.unwrap().len(), 1);
        let hit = store.lookup(&req).await.unwrap().unwrap();
        assert_eq!(hit.body, Bytes::from_static(b"two"));
    }

    #[tokio::test]
    async fn test_delete_store() {
        let storage = MemoryStorage::new();
        storage.open("old").await.unwrap();
        storage.open("new").await.unwrap();

        assert!(storage.delete("old").await.unwrap());
        assert!(!storage.delete("old").await.unwrap());
        assert_eq!(storage.names().await.unwrap(), vec!["new"]);
    }

    #[tokio::test]
    async fn test_open_same_name_shares_entries() {
        let storage = MemoryStorage::new();
        let a = storage.open("v1").await.unwrap();
        let req = Request::get("https://app.example.com/a");
        a.put(&req, response(b"x")).await.unwrap();

        let b = storage.open("v1").await.unwrap();
        assert!(b.lookup(&req).await.unwrap().is_some());
    }
}
