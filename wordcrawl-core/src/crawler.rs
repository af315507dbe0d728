use crate::clock::{Clock, SystemClock};
use crate::config::{CrawlerConfiguration, FetcherKind, host_parallelism};
use crate::error::Result;
use crate::rank::rank;
use crate::result::CrawlResult;
use crate::task::{CrawlState, CrawlTask};
use indexmap::IndexMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinSet;
use tracing::{info, warn};
use wordcrawl_fetch::{FixtureFetcher, HttpPageFetcher, PageFetcher};

/// Crawls pages on a fixed-size pool of worker threads.
///
/// The pool is created once and reused by every call to [`crawl`](Self::crawl);
/// visited URLs and word counts are per call.
pub struct ParallelWebCrawler {
    config: Arc<CrawlerConfiguration>,
    fetcher: Arc<dyn PageFetcher>,
    clock: Arc<dyn Clock>,
    runtime: Runtime,
    pool_size: usize,
}

impl ParallelWebCrawler {
    pub fn new(config: CrawlerConfiguration, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        let pool_size = config.parallelism().min(host_parallelism()).max(1);
        let runtime = Builder::new_multi_thread()
            .worker_threads(pool_size)
            .thread_name("wordcrawl-worker")
            .enable_all()
            .build()?;

        Ok(Self {
            config: Arc::new(config),
            fetcher,
            clock: Arc::new(SystemClock),
            runtime,
            pool_size,
        })
    }

    /// Build a crawler using the fetcher the configuration selects.
    pub fn from_config(config: CrawlerConfiguration) -> Result<Self> {
        let fetcher: Arc<dyn PageFetcher> = match config.fetcher() {
            FetcherKind::Http => Arc::new(
                HttpPageFetcher::with_timeout(config.request_timeout().as_secs())?
                    .with_ignored_words(config.ignored_words().to_vec()),
            ),
            FetcherKind::Fixture(path) => Arc::new(FixtureFetcher::load(path)?),
        };
        Self::new(config, fetcher)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &CrawlerConfiguration {
        &self.config
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Crawl from `starting_urls` and block until every spawned task has finished.
    ///
    /// Must not be called from inside an async runtime.
    pub fn crawl(&self, starting_urls: &[String]) -> CrawlResult {
        let started = Instant::now();
        let deadline = self.clock.now().checked_add(self.config.timeout());
        let state = Arc::new(CrawlState::new(
            deadline,
            self.clock.clone(),
            self.fetcher.clone(),
            self.config.clone(),
        ));

        info!(
            "Starting crawl of {} seed(s) with {} worker(s) using the {} fetcher (max depth {}, timeout {:?})",
            starting_urls.len(),
            self.pool_size,
            self.fetcher.name(),
            self.config.max_depth(),
            self.config.timeout()
        );

        self.runtime.block_on(async {
            let mut roots = JoinSet::new();
            for url in starting_urls {
                let task = CrawlTask::new(url.clone(), self.config.max_depth(), state.clone());
                roots.spawn(task.run());
            }

            while let Some(joined) = roots.join_next().await {
                if let Err(e) = joined {
                    warn!("Crawl task failed: {}", e);
                }
            }
        });

        let urls_visited = state.visited_count();
        let counts = state.word_counts();
        info!(
            "Crawl complete. Visited {} pages ({} failed), {} distinct words in {:?}",
            urls_visited,
            state.failed_fetches(),
            counts.len(),
            started.elapsed()
        );

        let word_counts = if counts.is_empty() {
            IndexMap::new()
        } else {
            rank(counts, self.config.popular_word_count())
        };

        CrawlResult::new(word_counts, urls_visited)
    }
}

/// Crawl `starting_urls` with a crawler built from `config`.
///
/// Fails only if the fetcher or the worker pool cannot be set up, which happens
/// before any page is fetched.
pub fn crawl(starting_urls: &[String], config: &CrawlerConfiguration) -> Result<CrawlResult> {
    let crawler = ParallelWebCrawler::from_config(config.clone())?;
    Ok(crawler.crawl(starting_urls))
}
