use crate::error::Result;
use crate::page::PageContents;

/// Source of page contents for the crawler.
///
/// Implementations are shared between every worker of a crawl, so they must be
/// safe to call concurrently. A failed fetch is reported through
/// [`FetchError`](crate::FetchError); callers decide whether it is fatal.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Fetch `url` and return its word counts and outbound links.
    async fn fetch(&self, url: &str) -> Result<PageContents>;
}
