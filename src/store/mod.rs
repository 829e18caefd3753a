//! Cache store abstraction.
//!
//! Mirrors the contract of a host cache API so the worker logic can run
//! against either a persistent disk store or an in-memory fake:
//!
//! - `CacheStorage`: the collection of named stores (open / names / delete)
//! - `CacheStore`: one key -> response mapping, keyed by request identity
//!
//! Entries carry a `cached_at` timestamp for diagnostics only; lookups never
//! consult it. Cache-first means no freshness check and no expiry - stale
//! stores are only ever removed wholesale when the version tag changes.

pub mod disk;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::models::{Request, Response};

pub use disk::DiskStorage;
pub use memory::MemoryStorage;

/// A stored response with its write timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEntry {
    pub request: Request,
    pub response: Response,
    pub cached_at: DateTime<Utc>,
}

impl StoredEntry {
    pub fn new(request: Request, response: Response) -> Self {
        Self {
            request,
            response,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

/// One named key -> response store.
///
/// `put` is atomic at the single-key level and last-write-wins; two
/// concurrent writers storing the same key is harmless since both carry the
/// same content.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up a response by request identity. Never checks freshness.
    async fn lookup(&self, request: &Request) -> Result<Option<Response>, CacheError>;

    /// Store a response keyed by the request, replacing any existing entry.
    async fn put(&self, request: &Request, response: Response) -> Result<(), CacheError>;

    /// All request keys currently stored, in no particular order.
    async fn keys(&self) -> Result<Vec<Request>, CacheError>;

    /// Full entries, for diagnostics.
    async fn entries(&self) -> Result<Vec<StoredEntry>, CacheError>;
}

/// The collection of named cache stores.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Open a store by name, creating it if absent.
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheStore>, CacheError>;

    /// Names of all existing stores.
    async fn names(&self) -> Result<Vec<String>, CacheError>;

    /// Delete a store wholesale. Returns whether it existed.
    async fn delete(&self, name: &str) -> Result<bool, CacheError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResponseKind;
    use bytes::Bytes;
    use chrono::Duration;

    fn entry() -> StoredEntry {
        StoredEntry::new(
            Request::get("https://app.example.com/"),
            Response::new(200, ResponseKind::Basic, "https://app.example.com/", Bytes::new()),
        )
    }

    #[test]
    fn test_age_display_just_now() {
        assert_eq!(entry().age_display(), "just now");
    }

    #[test]
    fn test_age_display_buckets() {
        let mut e = entry();
        e.cached_at = Utc::now() - Duration::minutes(5);
        assert_eq!(e.age_display(), "5m ago");
        e.cached_at = Utc::now() - Duration::hours(3);
        assert_eq!(e.age_display(), "3h ago");
        e.cached_at = Utc::now() - Duration::days(2);
        assert_eq!(e.age_display(), "2d ago");
    }
}
