//! budgetcache - offline asset cache for the Go-Budgeting web app.
//!
//! Implements the app's install/activate/fetch lifecycle over a versioned
//! cache store: core assets are pre-populated on install, stores from older
//! versions are deleted on activate, and intercepted requests are answered
//! cache-first with a network fallback. Backend API traffic (Supabase) is
//! never cached, and a cached entry document stands in for HTML requests
//! when both cache and network fail.

pub mod config;
pub mod error;
pub mod manifest;
pub mod models;
pub mod net;
pub mod store;
pub mod worker;

pub use config::Config;
pub use error::CacheError;
pub use manifest::{AssetManifest, BACKEND_API_HOST, CACHE_VERSION_TAG, OFFLINE_FALLBACK_DOC};
pub use models::{Method, Request, Response, ResponseKind};
pub use net::{Fetcher, HttpFetcher};
pub use store::{CacheStorage, CacheStore, DiskStorage, MemoryStorage};
pub use worker::{OfflineCacheManager, WorkerPhase};
