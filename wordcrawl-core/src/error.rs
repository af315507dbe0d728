use thiserror::Error;
use wordcrawl_fetch::FetchError;

/// Problems with a crawler configuration. Always raised before any crawling starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid {field} pattern '{pattern}': {source}")]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown fetcher implementation '{0}' (expected 'http' or 'fixture')")]
    UnknownFetcher(String),

    #[error("the fixture fetcher requires 'fixturePath'")]
    MissingFixturePath,

    #[error("{0} must be at least 1")]
    MustBePositive(&'static str),
}

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("fetcher setup failed: {0}")]
    Fetcher(#[from] FetchError),

    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CrawlError>;
