//! Asset manifest and cache versioning constants.
//!
//! The manifest is the fixed, ordered list of URLs pre-populated on install.
//! Relative entries are resolved against the configured application origin;
//! absolute entries are third-party resources cached as-is.
//!
//! The version tag must be bumped by the release process whenever the
//! manifest contents change; nothing here auto-detects manifest changes.

use url::Url;

use crate::error::CacheError;
use crate::models::Request;

// ============================================================================
// Constants
// ============================================================================

/// Name of the current cache generation. Exactly one store carries this
/// name; every other store is stale and deleted on activate.
pub const CACHE_VERSION_TAG: &str = "go-budgeting-v1.0.1";

/// Hostname substring identifying the backend-as-a-service provider.
/// Requests whose host contains this are never cached.
pub const BACKEND_API_HOST: &str = "supabase.co";

/// Root-relative entry document served when both cache and network fail
/// for an HTML request.
pub const OFFLINE_FALLBACK_DOC: &str = "./index.html";

/// Core assets fetched and stored at install time, in order:
/// the application root, the HTML entry point, the web app manifest, two
/// icons, and four third-party resources (CSS framework, icon library,
/// backend client library, web font stylesheet).
pub const CORE_ASSETS: [&str; 9] = [
    "./",
    "./index.html",
    "./manifest.json",
    "./icon-192x192.png",
    "./icon-512x512.png",
    "https://cdn.tailwindcss.com",
    "https://unpkg.com/lucide@latest",
    "https://cdn.jsdelivr.net/npm/@supabase/supabase-js@2.39.3/dist/umd/supabase.min.js",
    "https://fonts.googleapis.com/css2?family=Plus+Jakarta+Sans:wght@400;600;700;800&display=swap",
];

// ============================================================================
// Manifest
// ============================================================================

/// Ordered list of asset URLs to pre-populate. Defined once, never mutated
/// at runtime.
#[derive(Debug, Clone)]
pub struct AssetManifest {
    entries: Vec<String>,
}

impl AssetManifest {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve every entry against the application origin, producing the
    /// GET requests the install handler fetches in order. Relative entries
    /// join the origin; absolute entries pass through unchanged.
    pub fn resolve(&self, origin: &str) -> Result<Vec<Request>, CacheError> {
        let base = Url::parse(origin).map_err(|source| CacheError::InvalidUrl {
            url: origin.to_string(),
            source,
        })?;

        self.entries
            .iter()
            .map(|entry| {
                let resolved = base.join(entry).map_err(|source| CacheError::InvalidUrl {
                    url: entry.clone(),
                    source,
                })?;
                Ok(Request::get(resolved.to_string()))
            })
            .collect()
    }
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self::new(CORE_ASSETS.iter().map(|s| s.to_string()).collect())
    }
}

/// Resolve the offline fallback document against the application origin.
pub fn fallback_request(origin: &str) -> Result<Request, CacheError> {
    let base = Url::parse(origin).map_err(|source| CacheError::InvalidUrl {
        url: origin.to_string(),
        source,
    })?;
    let resolved = base
        .join(OFFLINE_FALLBACK_DOC)
        .map_err(|source| CacheError::InvalidUrl {
            url: OFFLINE_FALLBACK_DOC.to_string(),
            source,
        })?;
    Ok(Request::get(resolved.to_string()))
}
