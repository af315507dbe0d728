use crate::error::ConfigError;
use regex::Regex;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 1;
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 10;

/// Number of hardware threads available to this process.
pub fn host_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Which [`PageFetcher`](wordcrawl_fetch::PageFetcher) a crawl uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetcherKind {
    /// Live pages over HTTP.
    Http,
    /// Pages served from a JSON fixture file.
    Fixture(PathBuf),
}

/// Validated, immutable crawler settings.
#[derive(Debug, Clone)]
pub struct CrawlerConfiguration {
    starting_urls: Vec<String>,
    timeout: Duration,
    popular_word_count: usize,
    parallelism: usize,
    ignored_url_patterns: Vec<Regex>,
    ignored_words: Vec<Regex>,
    max_depth: usize,
    fetcher: FetcherKind,
    request_timeout: Duration,
    result_path: Option<PathBuf>,
}

impl CrawlerConfiguration {
    pub fn builder() -> CrawlerConfigurationBuilder {
        CrawlerConfigurationBuilder::default()
    }

    pub fn starting_urls(&self) -> &[String] {
        &self.starting_urls
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn popular_word_count(&self) -> usize {
        self.popular_word_count
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    pub fn ignored_url_patterns(&self) -> &[Regex] {
        &self.ignored_url_patterns
    }

    pub fn ignored_words(&self) -> &[Regex] {
        &self.ignored_words
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn fetcher(&self) -> &FetcherKind {
        &self.fetcher
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn result_path(&self) -> Option<&Path> {
        self.result_path.as_deref()
    }

    /// True when `url` is fully matched by one of the ignored-URL patterns.
    pub fn is_ignored_url(&self, url: &str) -> bool {
        self.ignored_url_patterns.iter().any(|p| p.is_match(url))
    }
}

/// Raw crawler settings as written in a configuration file.
///
/// Every field is optional; [`build`](Self::build) fills in defaults and
/// validates the result.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CrawlerConfigurationBuilder {
    #[serde(default, alias = "startPages")]
    starting_urls: Vec<String>,
    timeout_seconds: Option<u64>,
    popular_word_count: Option<usize>,
    parallelism: Option<usize>,
    #[serde(default, alias = "ignoredUrls")]
    ignored_url_patterns: Vec<String>,
    #[serde(default)]
    ignored_words: Vec<String>,
    max_depth: Option<usize>,
    #[serde(alias = "implementationOverride")]
    fetcher_implementation: Option<String>,
    fixture_path: Option<PathBuf>,
    request_timeout_seconds: Option<u64>,
    result_path: Option<PathBuf>,
}

impl CrawlerConfigurationBuilder {
    pub fn with_starting_urls(mut self, urls: Vec<String>) -> Self {
        self.starting_urls = urls;
        self
    }

    pub fn add_starting_url(mut self, url: impl Into<String>) -> Self {
        self.starting_urls.push(url.into());
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    pub fn with_popular_word_count(mut self, count: usize) -> Self {
        self.popular_word_count = Some(count);
        self
    }

    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = Some(parallelism);
        self
    }

    pub fn with_ignored_url_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignored_url_patterns = patterns;
        self
    }

    pub fn with_ignored_words(mut self, patterns: Vec<String>) -> Self {
        self.ignored_words = patterns;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_fetcher_implementation(mut self, name: impl Into<String>) -> Self {
        self.fetcher_implementation = Some(name.into());
        self
    }

    pub fn with_fixture_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.fixture_path = Some(path.into());
        self
    }

    pub fn with_request_timeout_seconds(mut self, seconds: u64) -> Self {
        self.request_timeout_seconds = Some(seconds);
        self
    }

    pub fn with_result_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.result_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<CrawlerConfiguration, ConfigError> {
        let parallelism = self.parallelism.unwrap_or_else(host_parallelism);
        if parallelism == 0 {
            return Err(ConfigError::MustBePositive("parallelism"));
        }

        let request_timeout_seconds = self
            .request_timeout_seconds
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECONDS);
        if request_timeout_seconds == 0 {
            return Err(ConfigError::MustBePositive("requestTimeoutSeconds"));
        }

        let fetcher = match self.fetcher_implementation.as_deref().map(str::trim) {
            None | Some("") | Some("http") => FetcherKind::Http,
            Some("fixture") => {
                FetcherKind::Fixture(self.fixture_path.ok_or(ConfigError::MissingFixturePath)?)
            }
            Some(other) => return Err(ConfigError::UnknownFetcher(other.to_string())),
        };

        Ok(CrawlerConfiguration {
            starting_urls: self.starting_urls,
            timeout: Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)),
            popular_word_count: self.popular_word_count.unwrap_or(0),
            parallelism,
            ignored_url_patterns: compile_patterns("ignoredUrlPatterns", &self.ignored_url_patterns)?,
            ignored_words: compile_patterns("ignoredWords", &self.ignored_words)?,
            max_depth: self.max_depth.unwrap_or(0),
            fetcher,
            request_timeout: Duration::from_secs(request_timeout_seconds),
            result_path: self.result_path,
        })
    }
}

/// Compile patterns so that `is_match` only succeeds on a full match.
fn compile_patterns(field: &'static str, patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| ConfigError::InvalidPattern {
                field,
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

/// Loads a JSON crawler configuration from disk.
pub struct ConfigurationLoader {
    path: PathBuf,
}

impl ConfigurationLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<CrawlerConfiguration, ConfigError> {
        self.load_builder()?.build()
    }

    /// Parse the file without validating it, so callers can apply overrides first.
    pub fn load_builder(&self) -> Result<CrawlerConfigurationBuilder, ConfigError> {
        let file = File::open(&self.path)?;
        Self::read_builder(BufReader::new(file))
    }

    pub fn read<R: Read>(reader: R) -> Result<CrawlerConfiguration, ConfigError> {
        Self::read_builder(reader)?.build()
    }

    pub fn read_builder<R: Read>(reader: R) -> Result<CrawlerConfigurationBuilder, ConfigError> {
        Ok(serde_json::from_reader(reader)?)
    }
}
