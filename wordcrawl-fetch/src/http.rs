use crate::error::{FetchError, Result};
use crate::fetcher::PageFetcher;
use crate::page::PageContents;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("wordcrawl/", env!("CARGO_PKG_VERSION"));

/// Elements whose text never counts as page words.
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Fetches pages over HTTP and extracts words and links from HTML bodies.
pub struct HttpPageFetcher {
    client: Client,
    ignored_words: Vec<Regex>,
}

impl HttpPageFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(10)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            ignored_words: Vec::new(),
        })
    }

    /// Words fully matched by any of these patterns are dropped from the counts.
    ///
    /// The patterns are used as given, so they should already be anchored
    /// (`^(?:...)$`) for whole-word semantics.
    pub fn with_ignored_words(mut self, patterns: Vec<Regex>) -> Self {
        self.ignored_words = patterns;
        self
    }

    /// Extract word counts and outbound links from an HTML document.
    pub fn parse_html(&self, html: &str, page_url: &str) -> Result<PageContents> {
        let document = Html::parse_document(html);

        let link_selector = selector("a[href]")?;
        let mut seen = HashSet::new();
        let mut links = Vec::new();
        for element in document.select(&link_selector) {
            if let Some(href) = element.value().attr("href")
                && let Some(absolute_url) = resolve_url(page_url, href)
                && seen.insert(absolute_url.clone())
            {
                links.push(absolute_url);
            }
        }

        let body_selector = selector("body")?;
        let mut word_counts = HashMap::new();
        if let Some(body) = document.select(&body_selector).next() {
            for text in visible_text(body) {
                for raw in text.split_whitespace() {
                    if let Some(word) = self.normalize_word(raw) {
                        *word_counts.entry(word).or_insert(0) += 1;
                    }
                }
            }
        }

        Ok(PageContents::new(word_counts, links))
    }

    fn normalize_word(&self, raw: &str) -> Option<String> {
        let word: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();

        if word.is_empty() || self.ignored_words.iter().any(|p| p.is_match(&word)) {
            return None;
        }
        Some(word)
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpPageFetcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, url: &str) -> Result<PageContents> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;
        debug!("Fetching {}", parsed);

        let start = Instant::now();
        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Only parse HTML content
        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("text/html"))
            .unwrap_or(false);

        let body = response.text().await?;
        debug!("Fetched {} ({} bytes) in {:?}", url, body.len(), start.elapsed());

        if !is_html {
            return Ok(PageContents::default());
        }
        self.parse_html(&body, url)
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| FetchError::ParseError(format!("selector {}: {}", css, e)))
}

/// Text nodes below `root`, skipping anything inside script-like elements.
fn visible_text(root: ElementRef<'_>) -> impl Iterator<Item = &str> {
    root.descendants().filter_map(|node| {
        let text = node.value().as_text()?;
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|e| HIDDEN_ELEMENTS.contains(&e.name()))
        });
        if hidden { None } else { Some(&**text) }
    })
}

fn resolve_url(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    // Skip empty, javascript:, mailto:, tel:, etc.
    if href.is_empty()
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with('#')
    {
        return None;
    }

    let base_url = Url::parse(base).ok()?;
    let mut resolved = base_url.join(href).ok()?;
    resolved.set_fragment(None);

    Some(resolved.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn html_page(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(
            format!("<html><head><title>T</title></head><body>{}</body></html>", body),
            "text/html; charset=utf-8",
        )
    }

    #[test]
    fn test_resolve_url_relative_and_fragment() {
        assert_eq!(
            resolve_url("http://example.com/a/b.html", "c.html#top"),
            Some("http://example.com/a/c.html".to_string())
        );
        assert_eq!(
            resolve_url("http://example.com/a/", "/root"),
            Some("http://example.com/root".to_string())
        );
        assert_eq!(resolve_url("http://example.com/", "mailto:x@y.z"), None);
        assert_eq!(resolve_url("http://example.com/", "#section"), None);
        assert_eq!(resolve_url("http://example.com/", "   "), None);
    }

    #[test]
    fn test_parse_html_counts_visible_words() {
        let fetcher = HttpPageFetcher::new().unwrap();
        let html = r#"<html><head><style>.x { color: red }</style></head><body>
            <p>The quick, brown fox!</p>
            <p>the LAZY dog &amp; the fox</p>
            <script>var hidden = "words";</script>
        </body></html>"#;

        let page = fetcher.parse_html(html, "http://example.com/").unwrap();

        assert_eq!(page.word_counts.get("the"), Some(&3));
        assert_eq!(page.word_counts.get("fox"), Some(&2));
        assert_eq!(page.word_counts.get("lazy"), Some(&1));
        assert!(!page.word_counts.contains_key("hidden"));
        assert!(!page.word_counts.contains_key("color"));
        assert!(!page.word_counts.contains_key(""));
        assert!(page.links.is_empty());
    }

    #[test]
    fn test_parse_html_ignored_words() {
        let fetcher = HttpPageFetcher::new()
            .unwrap()
            .with_ignored_words(vec![Regex::new("^(?:the|a)$").unwrap()]);

        let page = fetcher
            .parse_html("<body>the theory of a cat</body>", "http://example.com/")
            .unwrap();

        assert!(!page.word_counts.contains_key("the"));
        assert!(!page.word_counts.contains_key("a"));
        assert_eq!(page.word_counts.get("theory"), Some(&1));
        assert_eq!(page.word_counts.get("cat"), Some(&1));
    }

    #[test]
    fn test_parse_html_links_are_deduplicated_in_order() {
        let fetcher = HttpPageFetcher::new().unwrap();
        let html = r#"<body>
            <a href="/b">b</a>
            <a href="http://other.org/x#frag">x</a>
            <a href="/b#again">b again</a>
            <a href="javascript:void(0)">js</a>
        </body>"#;

        let page = fetcher.parse_html(html, "http://example.com/a").unwrap();

        assert_eq!(
            page.links,
            vec!["http://example.com/b".to_string(), "http://other.org/x".to_string()]
        );
    }

    #[tokio::test]
    async fn test_fetch_html_page() {
        let mock_server = MockServer::start().await;
        let body = format!(r#"<p>hello hello world</p><a href="{}/next">next</a>"#, mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html_page(&body))
            .mount(&mock_server)
            .await;

        let fetcher = HttpPageFetcher::new().unwrap();
        let page = fetcher.fetch(&mock_server.uri()).await.unwrap();

        assert_eq!(page.word_counts.get("hello"), Some(&2));
        assert_eq!(page.word_counts.get("world"), Some(&1));
        assert_eq!(page.word_counts.get("next"), Some(&1));
        assert_eq!(page.links, vec![format!("{}/next", mock_server.uri())]);
    }

    #[tokio::test]
    async fn test_fetch_non_html_is_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_string(r#"{"words": "not counted"}"#),
            )
            .mount(&mock_server)
            .await;

        let fetcher = HttpPageFetcher::new().unwrap();
        let page = fetcher
            .fetch(&format!("{}/data.json", mock_server.uri()))
            .await
            .unwrap();

        assert_eq!(page, PageContents::default());
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let fetcher = HttpPageFetcher::new().unwrap();
        let err = fetcher
            .fetch(&format!("{}/missing", mock_server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let fetcher = HttpPageFetcher::new().unwrap();
        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }
}
