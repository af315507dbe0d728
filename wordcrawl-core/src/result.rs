use indexmap::IndexMap;
use serde::Serialize;

/// Outcome of one crawl: the most popular words and how many pages were visited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    word_counts: IndexMap<String, usize>,
    urls_visited: usize,
}

impl CrawlResult {
    pub fn new(word_counts: IndexMap<String, usize>, urls_visited: usize) -> Self {
        Self {
            word_counts,
            urls_visited,
        }
    }

    /// Popular words in rank order.
    pub fn word_counts(&self) -> &IndexMap<String, usize> {
        &self.word_counts
    }

    pub fn urls_visited(&self) -> usize {
        self.urls_visited
    }
}
