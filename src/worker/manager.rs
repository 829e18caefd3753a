//! The offline cache manager.
//!
//! Owns the three lifecycle handlers plus the message handler:
//!
//! - install: pre-populate the current store from the asset manifest
//! - activate: delete every store not named by the current version tag,
//!   then claim all clients
//! - fetch: bypass the backend host, otherwise answer cache-first with a
//!   network fallback and an offline HTML fallback document
//! - message: honor skip-waiting requests from client pages

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::error::CacheError;
use crate::manifest::{self, AssetManifest, BACKEND_API_HOST, CACHE_VERSION_TAG};
use crate::models::{Method, Request, Response};
use crate::net::Fetcher;
use crate::store::{CacheStorage, CacheStore};

use super::lifecycle::{ClientMessage, WorkerPhase};

pub struct OfflineCacheManager {
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    /// Application origin relative manifest entries resolve against.
    origin: String,
    /// Name of the current cache generation.
    version: String,
    manifest: AssetManifest,
    /// Hostname substring that routes a request straight to the network.
    backend_host: String,
    phase: RwLock<WorkerPhase>,
    skip_waiting: AtomicBool,
    controlling: AtomicBool,
}

impl OfflineCacheManager {
    pub fn new(storage: Arc<dyn CacheStorage>, fetcher: Arc<dyn Fetcher>, origin: &str) -> Self {
        Self {
            storage,
            fetcher,
            origin: origin.to_string(),
            version: CACHE_VERSION_TAG.to_string(),
            manifest: AssetManifest::default(),
            backend_host: BACKEND_API_HOST.to_string(),
            phase: RwLock::new(WorkerPhase::Installing),
            skip_waiting: AtomicBool::new(false),
            controlling: AtomicBool::new(false),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_manifest(mut self, manifest: AssetManifest) -> Self {
        self.manifest = manifest;
        self
    }

    pub fn with_backend_host(mut self, host: impl Into<String>) -> Self {
        self.backend_host = host.into();
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn phase(&self) -> WorkerPhase {
        *self.phase.read().unwrap()
    }

    fn set_phase(&self, phase: WorkerPhase) {
        *self.phase.write().unwrap() = phase;
        debug!(%phase, "Worker phase changed");
    }

    /// Whether this worker has claimed the open clients.
    pub fn is_controlling(&self) -> bool {
        self.controlling.load(Ordering::SeqCst)
    }

    /// Whether immediate activation was requested.
    pub fn wants_skip_waiting(&self) -> bool {
        self.skip_waiting.load(Ordering::SeqCst)
    }

    // ========================================================================
    // Install
    // ========================================================================

    /// Install handler: pre-populate the current store with every manifest
    /// entry, in order. The batch stops at the first failure; whatever was
    /// stored before the failure stays (not transactional). Failures are
    /// logged, never retried, and never prevent install from completing.
    ///
    /// Also requests skip-waiting, so a fresh worker activates immediately
    /// instead of idling behind an old instance.
    pub async fn handle_install(&self) {
        self.set_phase(WorkerPhase::Installing);
        self.skip_waiting.store(true, Ordering::SeqCst);

        match self.precache().await {
            Ok(count) => info!(count, store = %self.version, "Cached core assets"),
            Err(e) => warn!(error = %e, "Cache error"),
        }

        self.set_phase(WorkerPhase::Installed);
    }

    async fn precache(&self) -> Result<usize, CacheError> {
        let requests = self.manifest.resolve(&self.origin)?;
        let store = self.storage.open(&self.version).await?;

        for request in &requests {
            let response = self
                .fetcher
                .fetch(request)
                .await
                .map_err(|e| CacheError::precache(&request.url, e))?;
            // A non-OK response fails the whole batch; a transient 404 must
            // not be pinned into the store until the next version bump.
            if !response.ok() {
                return Err(CacheError::precache(
                    &request.url,
                    CacheError::UnexpectedStatus(response.status),
                ));
            }
            store
                .put(request, response)
                .await
                .map_err(|e| CacheError::precache(&request.url, e))?;
        }

        Ok(requests.len())
    }

    // ========================================================================
    // Activate
    // ========================================================================

    /// Activate handler: delete every store whose name is not the current
    /// version tag. Deletions run concurrently and activation completes once
    /// all have settled; one failed deletion never blocks the others.
    /// Finishes by claiming all open clients.
    pub async fn handle_activate(&self) -> Result<(), CacheError> {
        self.set_phase(WorkerPhase::Activating);

        let names = self.storage.names().await?;
        let stale: Vec<String> = names.into_iter().filter(|n| *n != self.version).collect();

        let deletions = stale.iter().map(|name| async move {
            match self.storage.delete(name).await {
                Ok(true) => info!(store = %name, "Clearing old cache"),
                Ok(false) => {}
                Err(e) => warn!(store = %name, error = %e, "Failed to delete old cache"),
            }
        });
        join_all(deletions).await;

        self.controlling.store(true, Ordering::SeqCst);
        self.set_phase(WorkerPhase::Active);
        Ok(())
    }

    // ========================================================================
    // Fetch
    // ========================================================================

    /// Fetch handler. Returns `None` when neither cache nor network can
    /// answer and no fallback applies; the caller sees a silently failed
    /// request.
    ///
    /// Only GET requests are ever looked up or stored; replaying a
    /// side-effecting method from the cache is never acceptable.
    pub async fn handle_fetch(&self, request: &Request) -> Option<Response> {
        // Backend API traffic is never cached: straight to the network,
        // response returned verbatim whether success or error.
        if self.is_bypassed(request) {
            return match self.fetcher.fetch(request).await {
                Ok(response) => Some(response),
                Err(e) => {
                    debug!(url = %request.url, error = %e, "Bypassed fetch failed");
                    None
                }
            };
        }

        let store = match self.storage.open(&self.version).await {
            Ok(store) => Some(store),
            Err(e) => {
                warn!(error = %e, "Failed to open cache store");
                None
            }
        };

        let is_get = request.method == Method::Get;

        // Cache-first: a hit is returned as-is, no freshness check.
        if is_get {
            if let Some(store) = &store {
                match store.lookup(request).await {
                    Ok(Some(response)) => return Some(response),
                    Ok(None) => {}
                    Err(e) => debug!(url = %request.url, error = %e, "Cache lookup failed"),
                }
            }
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                // Only 200 same-origin responses to GETs enter the cache;
                // the stored copy is a clone so the returned one is
                // untouched.
                if is_get && response.is_cacheable() {
                    if let Some(store) = &store {
                        if let Err(e) = store.put(request, response.clone()).await {
                            warn!(url = %request.url, error = %e, "Failed to cache response");
                        }
                    }
                }
                Some(response)
            }
            Err(e) => {
                debug!(url = %request.url, error = %e, "Network fetch failed");
                self.offline_fallback(request, store.as_deref()).await
            }
        }
    }

    fn is_bypassed(&self, request: &Request) -> bool {
        request
            .host()
            .is_some_and(|host| host.contains(&self.backend_host))
    }

    /// Both cache and network failed: serve the cached entry document for
    /// HTML requests, nothing for anything else.
    async fn offline_fallback(
        &self,
        request: &Request,
        store: Option<&dyn CacheStore>,
    ) -> Option<Response> {
        if !request.is_document() {
            return None;
        }
        let store = store?;
        let fallback = match manifest::fallback_request(&self.origin) {
            Ok(req) => req,
            Err(e) => {
                warn!(error = %e, "Invalid offline fallback target");
                return None;
            }
        };
        match store.lookup(&fallback).await {
            Ok(hit) => hit,
            Err(e) => {
                debug!(error = %e, "Offline fallback lookup failed");
                None
            }
        }
    }

    // ========================================================================
    // Message
    // ========================================================================

    /// Message handler: a skip-waiting request promotes a waiting instance
    /// to active immediately. Every other message shape is ignored.
    pub fn handle_message(&self, message: &serde_json::Value) {
        match serde_json::from_value::<ClientMessage>(message.clone()) {
            Ok(ClientMessage::SkipWaiting) => self.skip_waiting_now(),
            Err(_) => debug!("Ignoring unrecognized client message"),
        }
    }

    fn skip_waiting_now(&self) {
        self.skip_waiting.store(true, Ordering::SeqCst);
        if self.phase() == WorkerPhase::Installed {
            info!("Skip waiting: promoting installed worker");
            self.set_phase(WorkerPhase::Active);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
