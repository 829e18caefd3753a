//! Persistent cache storage on the local filesystem.
//!
//! Layout: one directory per named store under the root, one JSON file per
//! entry. Entry file names are the SHA-256 of the request's cache key, so
//! arbitrary URLs map to stable, filesystem-safe names and rewriting a key
//! overwrites its file (last write wins).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::CacheError;
use crate::models::{Request, Response};

use super::{CacheStorage, CacheStore, StoredEntry};

pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    pub fn new(root: PathBuf) -> Result<Self, CacheError> {
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn store_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

#[async_trait]
impl CacheStorage for DiskStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheStore>, CacheError> {
        let dir = self.store_dir(name);
        fs::create_dir_all(&dir)?;
        Ok(Arc::new(DiskStore { dir }))
    }

    async fn names(&self) -> Result<Vec<String>, CacheError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    async fn delete(&self, name: &str) -> Result<bool, CacheError> {
        let dir = self.store_dir(name);
        if !dir.exists() {
            return Ok(false);
        }
        fs::remove_dir_all(&dir)?;
        debug!(store = name, "Deleted cache store");
        Ok(true)
    }
}

pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    fn entry_path(&self, request: &Request) -> PathBuf {
        let digest = Sha256::digest(request.cache_key().as_bytes());
        self.dir.join(format!("{}.json", hex::encode(digest)))
    }

    fn read_entry(path: &Path) -> Result<StoredEntry, CacheError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[async_trait]
impl CacheStore for DiskStore {
    async fn lookup(&self, request: &Request) -> Result<Option<Response>, CacheError> {
        let path = self.entry_path(request);
        if !path.exists() {
            return Ok(None);
        }
        let entry = Self::read_entry(&path)?;
        Ok(Some(entry.response))
    }

    async fn put(&self, request: &Request, response: Response) -> Result<(), CacheError> {
        let entry = StoredEntry::new(request.clone(), response);
        let contents = serde_json::to_string(&entry)?;
        fs::write(self.entry_path(request), contents)?;
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<Request>, CacheError> {
        Ok(self
            .entries()
            .await?
            .into_iter()
            .map(|e| e.request)
            .collect())
    }

    async fn entries(&self) -> Result<Vec<StoredEntry>, CacheError> {
        let mut entries = Vec::new();
        for dirent in fs::read_dir(&self.dir)? {
            let dirent = dirent?;
            let path = dirent.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read_entry(&path) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    // A torn write from an interrupted run; skip it
                    debug!(path = %path.display(), error = %e, "Skipping unreadable cache entry");
                }
            }
        }
        Ok(entries)
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
        .with_content_type("text/html")
    }

    #[tokio::test]
    async fn test_put_lookup_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = DiskStorage::new(tmp.path().to_path_buf()).unwrap();
        let store = storage.open("v1").await.unwrap();

        let req = Request::get("https://app.example.com/index.html");
        store.put(&req, response(b"<html></html>")).await.unwrap();

        let hit = store.lookup(&req).await.unwrap().unwrap();
        assert_eq!(hit.status, 200);
        assert_eq!(hit.body, Bytes::from_static(b"<html></html>"));
        assert_eq!(hit.content_type.as_deref(), Some("text/html"));
    }

    #[tokio::test]
    async fn test_lookup_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = DiskStorage::new(tmp.path().to_path_buf()).unwrap();
        let store = storage.open("v1").await.unwrap();

        let req = Request::get("https://app.example.com/missing");
        assert!(store.lookup(&req).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_names_and_delete() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = DiskStorage::new(tmp.path().to_path_buf()).unwrap();
        storage.open("go-budgeting-v1.0.0").await.unwrap();
        storage.open("go-budgeting-v1.0.1").await.unwrap();

        let mut names = storage.names().await.unwrap();
        names.sort();
        assert_eq!(names, vec!["go-budgeting-v1.0.0", "go-budgeting-v1.0.1"]);

        assert!(storage.delete("go-budgeting-v1.0.0").await.unwrap());
        assert!(!storage.delete("go-budgeting-v1.0.0").await.unwrap());
        assert_eq!(storage.names().await.unwrap(), vec!["go-budgeting-v1.0.1"]);
    }

    #[tokio::test]
    async fn test_keys_survive_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = DiskStorage::new(tmp.path().to_path_buf()).unwrap();
        let req = Request::get("https://app.example.com/manifest.json");

        {
            let store = storage.open("v1").await.unwrap();
            store.put(&req, response(b"{}")).await.unwrap();
        }

        let reopened = DiskStorage::new(tmp.path().to_path_buf()).unwrap();
        let store = reopened.open("v1").await.unwrap();
        let keys = store.keys().await.unwrap();
        assert_eq!(keys, vec![req]);
    }

    #[tokio::test]
    async fn test_rewrite_overwrites_same_file() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = DiskStorage::new(tmp.path().to_path_buf()).unwrap();
        let store = storage.open("v1").await.unwrap();
        let req = Request::get("https://app.example.com/a");

        store.put(&req, response(b"one")).await.unwrap();
        store.put(&req, response(b"two")).await.unwrap();

        assert_eq!(store.keys().await.unwrap().len(), 1);
        let hit = store.lookup(&req).await.unwrap().unwrap();
        assert_eq!(hit.body, Bytes::from_static(b"two"));
    }
}
