// ABOUTME: Configuration options for the movie scraper and the fluent ScraperBuilder.
// ABOUTME: Covers page/chart base URLs, subsections, HTTP settings and the on-disk cache.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::chart::DEFAULT_CHART_BASE_URL;
use crate::client::Scraper;
use crate::error::ScrapeError;
use crate::resource::DEFAULT_SUBSECTIONS;

pub const DEFAULT_BASE_URL: &str = "https://imdb.com/title/tt";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Configuration options for the scraper.
#[derive(Debug, Clone)]
pub struct Options {
    /// Prefix the zero-padded movie id is appended to.
    pub base_url: String,
    /// Subsection pages fetched after the main page, in order.
    pub subsections: Vec<String>,
    pub timeout: Duration,
    pub user_agent: String,
    pub headers: HashMap<String, String>,
    pub http_client: Option<reqwest::Client>,
    pub cache_dir: Option<PathBuf>,
    /// Serve cached blobs instead of fetching when present.
    pub use_cache: bool,
    pub chart_base_url: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            subsections: DEFAULT_SUBSECTIONS.iter().map(|s| s.to_string()).collect(),
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: HashMap::new(),
            http_client: None,
            cache_dir: None,
            use_cache: false,
            chart_base_url: DEFAULT_CHART_BASE_URL.to_string(),
        }
    }
}

/// Builder for constructing Scraper instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ScraperBuilder {
    opts: Options,
}

impl ScraperBuilder {
    /// Create a new ScraperBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.opts.base_url = base_url.into();
        self
    }

    /// Replace the subsection list. An empty list fetches only the main page.
    pub fn subsections<I, S>(mut self, subsections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.opts.subsections = subsections.into_iter().map(Into::into).collect();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Use a custom HTTP client. User agent and timeout are then left to it.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.opts.cache_dir = Some(dir.into());
        self
    }

    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.opts.use_cache = use_cache;
        self
    }

    pub fn chart_base_url(mut self, url: impl Into<String>) -> Self {
        self.opts.chart_base_url = url.into();
        self
    }

    /// The options collected so far.
    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Build the Scraper with the configured options.
    pub fn build(self) -> Result<Scraper, ScrapeError> {
        Scraper::new(self.opts)
    }
}

impl Default for ScraperBuilder {
    fn default() -> Self {
        Self::new()
    }
}
