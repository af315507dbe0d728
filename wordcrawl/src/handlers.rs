use anyhow::{Context, Result, bail};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use url::Url;
use wordcrawl_core::{CrawlResult, CrawlerConfiguration, CrawlerConfigurationBuilder, FetcherKind};

/// How a crawl result is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Command-line values that replace the ones from the configuration file.
#[derive(Debug, Clone, Default)]
pub struct CrawlOverrides {
    pub urls: Vec<Url>,
    pub urls_file: Option<PathBuf>,
    pub max_depth: Option<usize>,
    pub timeout_seconds: Option<u64>,
    pub parallelism: Option<usize>,
    pub popular_word_count: Option<usize>,
    pub output: Option<PathBuf>,
}

/// Expand a leading `~` in a user-supplied path.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Apply command-line overrides on top of a parsed configuration file.
///
/// Seed URLs given on the command line (directly or through a file) replace the
/// configured ones rather than adding to them.
pub fn apply_overrides(
    mut builder: CrawlerConfigurationBuilder,
    overrides: &CrawlOverrides,
) -> Result<CrawlerConfigurationBuilder> {
    let mut seeds: Vec<String> = overrides.urls.iter().map(|u| u.as_str().to_string()).collect();
    if let Some(path) = &overrides.urls_file {
        seeds.extend(load_urls_from_file(path)?);
    }
    if !seeds.is_empty() {
        builder = builder.with_starting_urls(seeds);
    }

    if let Some(depth) = overrides.max_depth {
        builder = builder.with_max_depth(depth);
    }
    if let Some(timeout) = overrides.timeout_seconds {
        builder = builder.with_timeout_seconds(timeout);
    }
    if let Some(parallelism) = overrides.parallelism {
        builder = builder.with_parallelism(parallelism);
    }
    if let Some(count) = overrides.popular_word_count {
        builder = builder.with_popular_word_count(count);
    }
    if let Some(output) = &overrides.output {
        builder = builder.with_result_path(output.clone());
    }

    Ok(builder)
}

/// Load and parse URLs from a file
pub fn load_urls_from_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read URL file {}", path.display()))?;

    let urls: Vec<String> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| parse_url_line(line.trim()))
        .collect();

    if urls.is_empty() {
        bail!("No valid URLs found in {}", path.display());
    }

    Ok(urls)
}

/// Parse a single line as a URL, trying to add http:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    // Try to parse as-is
    if Url::parse(line).is_ok() {
        return Some(line.to_string());
    }

    // Try adding http://
    let with_scheme = format!("http://{}", line);
    if Url::parse(&with_scheme).is_ok() {
        return Some(with_scheme);
    }

    warn!("Skipping invalid URL '{}'", line);
    None
}

pub fn render_json(result: &CrawlResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize crawl result")
}

pub fn render_text(result: &CrawlResult) -> String {
    let mut report = String::new();
    report.push_str(&format!("{}\n", "━".repeat(52)));
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Pages visited: {}\n", result.urls_visited()));
    report.push_str(&format!("  Popular words: {}\n", result.word_counts().len()));
    report.push_str(&format!("{}\n", "━".repeat(52)));

    if result.word_counts().is_empty() {
        report.push_str("  (no words found)\n");
        return report;
    }

    let width = result
        .word_counts()
        .keys()
        .map(|w| w.chars().count())
        .max()
        .unwrap_or(0);

    for (rank, (word, count)) in result.word_counts().iter().enumerate() {
        let padding = " ".repeat(width - word.chars().count());
        report.push_str(&format!(
            "  {:>3}. {}{}  {}\n",
            rank + 1,
            word.bright_white().bold(),
            padding,
            count.to_string().green()
        ));
    }

    report
}

/// Short human-readable description of a configuration.
pub fn describe_configuration(config: &CrawlerConfiguration) -> String {
    let fetcher = match config.fetcher() {
        FetcherKind::Http => "http".to_string(),
        FetcherKind::Fixture(path) => format!("fixture ({})", path.display()),
    };

    let mut summary = String::new();
    summary.push_str(&format!("  Seed URLs: {}\n", config.starting_urls().len()));
    for url in config.starting_urls() {
        summary.push_str(&format!("    - {}\n", url));
    }
    summary.push_str(&format!("  Max depth: {}\n", config.max_depth()));
    summary.push_str(&format!("  Timeout: {}s\n", config.timeout().as_secs()));
    summary.push_str(&format!("  Parallelism: {}\n", config.parallelism()));
    summary.push_str(&format!("  Popular words: {}\n", config.popular_word_count()));
    summary.push_str(&format!("  Ignored URL patterns: {}\n", config.ignored_url_patterns().len()));
    summary.push_str(&format!("  Ignored word patterns: {}\n", config.ignored_words().len()));
    summary.push_str(&format!("  Fetcher: {}\n", fetcher));
    if let Some(path) = config.result_path() {
        summary.push_str(&format!("  Result path: {}\n", path.display()));
    }
    summary
}

/// Write `report` to `path`, or to stdout when no path is given.
pub fn write_output(report: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => fs::write(path, report)
            .with_context(|| format!("Failed to write result to {}", path.display())),
        None => {
            print!("{}", report);
            Ok(())
        }
    }
}
