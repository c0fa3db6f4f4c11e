// ABOUTME: The Scraper ties fetching, caching and field extraction together for movie ids.
// ABOUTME: Provides async scrape()/scrape_many()/chart_ids() and the offline parse_html().

use futures::stream::{self, StreamExt};
use scraper::Html;
use tracing::{debug, info};

use crate::cache::BlobCache;
use crate::chart::{parse_chart_ids, ChartListing};
use crate::error::ScrapeError;
use crate::extractors::extract_record;
use crate::options::{Options, ScraperBuilder};
use crate::record::MovieRecord;
use crate::resource::{decode_body, fetch, fetch_movie_blob, FetchOptions};

/// Scrapes movie records by id.
#[derive(Debug, Clone)]
pub struct Scraper {
    opts: Options,
    http_client: reqwest::Client,
    cache: Option<BlobCache>,
}

impl Scraper {
    /// Create a new ScraperBuilder for configuring the scraper.
    pub fn builder() -> ScraperBuilder {
        ScraperBuilder::new()
    }

    /// Create a new Scraper with the given options.
    pub fn new(opts: Options) -> Result<Self, ScrapeError> {
        let http_client = match opts.http_client.clone() {
            Some(client) => client,
            None => reqwest::Client::builder()
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .cookie_store(true)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .map_err(|e| {
                    ScrapeError::fetch(
                        &opts.base_url,
                        "BuildClient",
                        Some(anyhow::Error::new(e)),
                    )
                })?,
        };
        let cache = opts.cache_dir.clone().map(BlobCache::new);

        Ok(Self {
            opts,
            http_client,
            cache,
        })
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            headers: self.opts.headers.clone(),
            parse_non_200: false,
        }
    }

    /// Raw page text for `id`: the main page followed by every subsection.
    ///
    /// With `use_cache` set, a cached blob is returned without touching the
    /// network. Freshly fetched blobs are written to the cache directory when
    /// one is configured.
    pub async fn page_content(&self, id: u32) -> Result<String, ScrapeError> {
        if self.opts.use_cache {
            if let Some(cache) = &self.cache {
                if let Some(blob) = cache.load(id).await? {
                    return Ok(decode_body(&blob, None));
                }
            }
        }

        let blob = fetch_movie_blob(
            &self.http_client,
            &self.opts.base_url,
            id,
            &self.opts.subsections,
            &self.fetch_options(),
        )
        .await?;

        if let Some(cache) = &self.cache {
            cache.store(id, &blob).await?;
        }
        Ok(decode_body(&blob, None))
    }

    /// Extracts a record from already retrieved page text.
    pub fn parse_html(&self, id: u32, html: &str) -> Result<MovieRecord, ScrapeError> {
        let doc = Html::parse_document(html);
        extract_record(id, &doc).map_err(|e| ScrapeError::extract(id.to_string(), e))
    }

    /// Fetches (or loads from cache) and extracts the record for `id`.
    pub async fn scrape(&self, id: u32) -> Result<MovieRecord, ScrapeError> {
        let html = self.page_content(id).await?;
        let record = self.parse_html(id, &html)?;
        info!(id, title = %record.title, year = record.year, "scraped movie");
        Ok(record)
    }

    /// Scrapes several ids with at most `concurrency` jobs in flight.
    ///
    /// Results come back in the order of `ids`; one failure does not stop
    /// the others.
    pub async fn scrape_many(
        &self,
        ids: &[u32],
        concurrency: usize,
    ) -> Vec<(u32, Result<MovieRecord, ScrapeError>)> {
        let limit = concurrency.max(1);
        debug!(count = ids.len(), limit, "scraping batch");

        let mut results: Vec<_> = stream::iter(ids.iter().copied().enumerate())
            .map(|(idx, id)| async move { (idx, id, self.scrape(id).await) })
            .buffer_unordered(limit)
            .collect()
            .await;
        results.sort_by_key(|(idx, _, _)| *idx);
        results
            .into_iter()
            .map(|(_, id, result)| (id, result))
            .collect()
    }

    /// Movie ids listed on a chart page, in chart order.
    pub async fn chart_ids(&self, listing: ChartListing) -> Result<Vec<u32>, ScrapeError> {
        let url = listing.url(&self.opts.chart_base_url);
        info!(%listing, url = %url, "retrieving chart");
        let page = fetch(&self.http_client, &url, &self.fetch_options()).await?;
        let ids = parse_chart_ids(&Html::parse_document(&page.text()));
        if ids.is_empty() {
            return Err(ScrapeError::listing(
                listing.to_string(),
                Some(anyhow::anyhow!("no chart entries found at {}", url)),
            ));
        }
        Ok(ids)
    }
}
