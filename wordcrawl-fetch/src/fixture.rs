use crate::error::{FetchError, Result};
use crate::fetcher::PageFetcher;
use crate::page::PageContents;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Serves pages from a fixed table instead of the network.
///
/// The JSON form maps each URL to its page:
///
/// ```json
/// { "http://a": { "wordCounts": { "foo": 1 }, "links": ["http://b"] } }
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixtureFetcher {
    pages: HashMap<String, PageContents>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, page: PageContents) -> Self {
        self.pages.insert(url.into(), page);
        self
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let pages: HashMap<String, PageContents> = serde_json::from_reader(reader)?;
        Ok(Self { pages })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let fetcher = Self::from_reader(std::io::BufReader::new(file))?;
        debug!("Loaded {} fixture pages from {}", fetcher.len(), path.display());
        Ok(fetcher)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[async_trait::async_trait]
impl PageFetcher for FixtureFetcher {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn fetch(&self, url: &str) -> Result<PageContents> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}
