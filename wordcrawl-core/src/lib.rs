pub mod clock;
pub mod config;
pub mod crawler;
pub mod error;
pub mod rank;
pub mod result;
mod task;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigurationLoader, CrawlerConfiguration, CrawlerConfigurationBuilder, FetcherKind};
pub use crawler::{ParallelWebCrawler, crawl};
pub use error::{ConfigError, CrawlError};
pub use rank::rank;
pub use result::CrawlResult;

pub use wordcrawl_fetch::{FetchError, FixtureFetcher, HttpPageFetcher, PageContents, PageFetcher};
