//! Intercepted request identity.
//!
//! A request is identified by its method plus URL; that pair is the cache
//! key. Requests are inspected by the fetch handler to decide bypass vs.
//! cache-first handling and are never persisted themselves.

use serde::{Deserialize, Serialize};
use url::Url;

/// HTTP methods the cache distinguishes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Head => write!(f, "HEAD"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// An intercepted network request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Request {
    pub method: Method,
    pub url: String,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
        }
    }

    /// GET request for an absolute URL.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// Cache key: request identity as "METHOD url".
    ///
    /// The URL is normalized through a parse so that equivalent spellings
    /// (`https://cdn.example.com` vs `https://cdn.example.com/`) share one
    /// key; unparsable input falls back to the raw string.
    pub fn cache_key(&self) -> String {
        let url = Url::parse(&self.url)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| self.url.clone());
        format!("{} {}", self.method, url)
    }

    /// Hostname of the request URL, if it parses as an absolute URL.
    pub fn host(&self) -> Option<String> {
        Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
    }

    /// Whether this request targets an HTML document, per the offline
    /// fallback rule: the URL contains the ".html" substring.
    pub fn is_document(&self) -> bool {
        self.url.contains(".html")
    }
}

impl std::fmt::Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}
