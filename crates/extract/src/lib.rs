// ABOUTME: Main library entry point for the filmfacts movie metadata extractor.
// ABOUTME: Re-exports the public API: Scraper, ScraperBuilder, Options, MovieRecord and the error types.

//! filmfacts - structured movie metadata from IMDb-style title pages.
//!
//! A movie page (the title page followed by its subsection pages) is parsed
//! once and every field is pulled out through an ordered cascade of
//! layout-specific strategies, so both the current and the legacy markup
//! produce the same [`MovieRecord`].
//!
//! # Example
//!
//! ```no_run
//! use filmfacts_extract::{ScrapeError, Scraper};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ScrapeError> {
//!     let scraper = Scraper::builder().build()?;
//!     let record = scraper.scrape(468569).await?;
//!     println!("{} ({})", record.title, record.year);
//!     Ok(())
//! }
//! ```
//!
//! Extraction works without any network access too:
//!
//! ```
//! let html = r#"<meta property="og:title" content="Primer (2004)">"#;
//! let record = filmfacts_extract::extract_record_from_html(390384, html).unwrap();
//! assert_eq!(record.year, 2004);
//! ```

pub mod cache;
pub mod chart;
pub mod client;
pub mod error;
pub mod extractors;
pub mod options;
pub mod record;
pub mod resource;

pub use crate::cache::BlobCache;
pub use crate::chart::ChartListing;
pub use crate::client::Scraper;
pub use crate::error::{ErrorCode, ExtractionError, ScrapeError};
pub use crate::extractors::{extract_record, extract_record_from_html};
pub use crate::options::{Options, ScraperBuilder};
pub use crate::record::{AwardEntry, MovieRecord, Ratings, Role, NO_CERTIFICATE};

/// Result alias for the orchestration layer.
pub type Result<T> = std::result::Result<T, ScrapeError>;
