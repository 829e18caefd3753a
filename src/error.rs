use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Invalid cache entry: {0}")]
    InvalidEntry(#[from] serde_json::Error),

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("Unexpected HTTP status {0}")]
    UnexpectedStatus(u16),

    #[error("Failed to pre-populate '{url}': {source}")]
    Precache {
        url: String,
        #[source]
        source: Box<CacheError>,
    },
}

impl CacheError {
    /// Wrap a failure from the install-time pre-population batch,
    /// recording which manifest entry broke it.
    pub fn precache(url: impl Into<String>, source: CacheError) -> Self {
        CacheError::Precache {
            url: url.into(),
            source: Box::new(source),
        }
    }
}
