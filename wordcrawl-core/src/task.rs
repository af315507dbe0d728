use crate::clock::Clock;
use crate::config::CrawlerConfiguration;
use dashmap::{DashMap, DashSet};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, warn};
use wordcrawl_fetch::PageFetcher;

/// Everything the tasks of one crawl share. Created fresh for every crawl.
pub(crate) struct CrawlState {
    /// `None` when the timeout is too large to represent.
    deadline: Option<Instant>,
    clock: Arc<dyn Clock>,
    fetcher: Arc<dyn PageFetcher>,
    config: Arc<CrawlerConfiguration>,
    visited: DashSet<String>,
    word_counts: DashMap<String, usize>,
    failed_fetches: AtomicUsize,
}

impl CrawlState {
    pub(crate) fn new(
        deadline: Option<Instant>,
        clock: Arc<dyn Clock>,
        fetcher: Arc<dyn PageFetcher>,
        config: Arc<CrawlerConfiguration>,
    ) -> Self {
        Self {
            deadline,
            clock,
            fetcher,
            config,
            visited: DashSet::new(),
            word_counts: DashMap::new(),
            failed_fetches: AtomicUsize::new(0),
        }
    }

    pub(crate) fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub(crate) fn failed_fetches(&self) -> usize {
        self.failed_fetches.load(Ordering::Relaxed)
    }

    pub(crate) fn word_counts(&self) -> Vec<(String, usize)> {
        self.word_counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|deadline| self.clock.now() >= deadline)
    }

    /// Atomically claim `url`. Only the first caller for a given URL gets `true`.
    fn claim(&self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    fn merge(&self, counts: HashMap<String, usize>) {
        for (word, count) in counts {
            *self.word_counts.entry(word).or_insert(0) += count;
        }
    }
}

/// Visit of a single URL plus, transitively, everything it links to.
pub(crate) struct CrawlTask {
    url: String,
    remaining_depth: usize,
    state: Arc<CrawlState>,
}

impl CrawlTask {
    pub(crate) fn new(url: String, remaining_depth: usize, state: Arc<CrawlState>) -> Self {
        Self {
            url,
            remaining_depth,
            state,
        }
    }

    /// Run the task; resolves once this page and all of its subtasks are done.
    pub(crate) fn run(self) -> BoxFuture<'static, ()> {
        async move {
            if !self.should_visit() {
                return;
            }

            let page = match self.state.fetcher.fetch(&self.url).await {
                Ok(page) => page,
                Err(e) => {
                    self.state.failed_fetches.fetch_add(1, Ordering::Relaxed);
                    warn!("Fetch failed for {}: {}", self.url, e);
                    return;
                }
            };

            debug!(
                "Visited {} ({} distinct words, {} links, depth left {})",
                self.url,
                page.word_counts.len(),
                page.links.len(),
                self.remaining_depth
            );
            self.state.merge(page.word_counts);

            // Children at depth 0 would stop before fetching anything
            let child_depth = self.remaining_depth - 1;
            if child_depth == 0 {
                return;
            }

            let mut children = JoinSet::new();
            for link in page.links {
                let child = CrawlTask::new(link, child_depth, self.state.clone());
                children.spawn(child.run());
            }

            while let Some(joined) = children.join_next().await {
                if let Err(e) = joined {
                    warn!("Subtask of {} failed: {}", self.url, e);
                }
            }
        }
        .boxed()
    }

    /// Entry checks, in order: depth, deadline, ignore patterns, then the visit claim.
    fn should_visit(&self) -> bool {
        if self.remaining_depth == 0 {
            return false;
        }

        if self.state.deadline_passed() {
            debug!("Deadline passed, skipping {}", self.url);
            return false;
        }

        if self.state.config.is_ignored_url(&self.url) {
            debug!("Ignoring {}", self.url);
            return false;
        }

        if !self.state.claim(&self.url) {
            debug!("Already visited {}", self.url);
            return false;
        }

        true
    }
}
