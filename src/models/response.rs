//! Response model.
//!
//! Bodies are `bytes::Bytes`, so cloning a response is cheap and the fetch
//! handler can store one copy and return the other without consuming either.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// How a response relates to the application origin.
///
/// Only `Basic` (same-origin, non-error) responses are eligible for runtime
/// caching; everything else is passed through to the caller uncached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseKind {
    /// Same-origin response with full visibility.
    Basic,
    /// Cross-origin response obtained without CORS visibility.
    Opaque,
    /// Transport-level failure standing in for a response.
    Error,
}

/// A network or cached response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub kind: ResponseKind,
    /// Final URL the response was served from.
    pub url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, kind: ResponseKind, url: impl Into<String>, body: Bytes) -> Self {
        Self {
            status,
            kind,
            url: url.into(),
            content_type: None,
            body,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Runtime caching rule: exactly HTTP 200 and same-origin "basic".
    /// Errors, opaque cross-origin responses and redirects never qualify.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.kind == ResponseKind::Basic
    }
}
