//! Network fetcher.
//!
//! `HttpFetcher` performs the actual network roundtrips behind the `Fetcher`
//! trait so the worker can be exercised against a scripted fetcher in tests.
//!
//! No request timeout is configured; an in-flight fetch may hang as long as
//! the transport allows, matching the pass-through contract of the cache.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::CacheError;
use crate::models::{Method, Request, Response, ResponseKind};

/// Performs a network fetch for an intercepted request.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, CacheError>;
}

/// Fetcher backed by a shared `reqwest::Client`.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    origin: Url,
}

impl HttpFetcher {
    /// Create a fetcher that classifies responses against the given
    /// application origin.
    pub fn new(origin: &str) -> Result<Self, CacheError> {
        let origin = Url::parse(origin).map_err(|source| CacheError::InvalidUrl {
            url: origin.to_string(),
            source,
        })?;
        let client = Client::builder().build()?;
        Ok(Self { client, origin })
    }

    /// Same-origin responses are "basic"; anything cross-origin is treated
    /// as opaque, since nothing beyond its bytes and status is trusted.
    fn classify(&self, final_url: &Url) -> ResponseKind {
        if final_url.scheme() == self.origin.scheme()
            && final_url.host_str() == self.origin.host_str()
            && final_url.port_or_known_default() == self.origin.port_or_known_default()
        {
            ResponseKind::Basic
        } else {
            ResponseKind::Opaque
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, CacheError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Head => reqwest::Method::HEAD,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let response = self.client.request(method, &request.url).send().await?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let kind = self.classify(&final_url);
        let body = response.bytes().await?;

        debug!(url = %request.url, status, ?kind, "Fetched");

        let mut resp = Response::new(status, kind, final_url.to_string(), body);
        if let Some(ct) = content_type {
            resp = resp.with_content_type(ct);
        }
        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_same_origin() {
        let fetcher = HttpFetcher::new("https://app.example.com/").unwrap();
        let same = Url::parse("https://app.example.com/index.html").unwrap();
        assert_eq!(fetcher.classify(&same), ResponseKind::Basic);
    }

    #[test]
    fn test_classify_cross_origin() {
        let fetcher = HttpFetcher::new("https://app.example.com/").unwrap();
        let cdn = Url::parse("https://cdn.tailwindcss.com/").unwrap();
        assert_eq!(fetcher.classify(&cdn), ResponseKind::Opaque);

        let other_scheme = Url::parse("http://app.example.com/").unwrap();
        assert_eq!(fetcher.classify(&other_scheme), ResponseKind::Opaque);
    }

    #[test]
    fn test_default_port_is_same_origin() {
        let fetcher = HttpFetcher::new("https://app.example.com/").unwrap();
        let explicit = Url::parse("https://app.example.com:443/a").unwrap();
        assert_eq!(fetcher.classify(&explicit), ResponseKind::Basic);
    }

    #[test]
    fn test_bad_origin_rejected() {
        assert!(HttpFetcher::new("not a url").is_err());
    }
}
