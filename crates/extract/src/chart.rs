// ABOUTME: Named chart listings (top 250, bottom 100, top 250 English) and their id parsing.
// ABOUTME: A chart page lists movies as `div.wlb_ribbon` elements carrying a `data-tconst` id.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

use crate::error::ScrapeError;

pub const DEFAULT_CHART_BASE_URL: &str = "https://www.imdb.com/";

static RIBBON: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.wlb_ribbon[data-tconst]").unwrap());

/// A chart page whose entries can be listed as movie ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartListing {
    Top250,
    Bottom100,
    Top250English,
}

impl ChartListing {
    pub const ALL: [ChartListing; 3] = [
        ChartListing::Top250,
        ChartListing::Bottom100,
        ChartListing::Top250English,
    ];

    /// Path of the chart relative to the site root.
    pub fn path(self) -> &'static str {
        match self {
            ChartListing::Top250 => "chart/top",
            ChartListing::Bottom100 => "chart/bottom",
            ChartListing::Top250English => "chart/top-english-movies",
        }
    }

    /// Full chart URL under `base` (which should end with `/`).
    pub fn url(self, base: &str) -> String {
        format!("{}{}", base, self.path())
    }

    fn name(self) -> &'static str {
        match self {
            ChartListing::Top250 => "top250",
            ChartListing::Bottom100 => "bottom100",
            ChartListing::Top250English => "top250-english",
        }
    }
}

impl fmt::Display for ChartListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartListing {
    type Err = ScrapeError;

    /// Accepts the short names as well as the legacy `URL_*` listing keys.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top250" | "url_top250" => Ok(ChartListing::Top250),
            "bottom100" | "url_bottom100" => Ok(ChartListing::Bottom100),
            "top250-english" | "top250_english" | "url_top250_engl" => {
                Ok(ChartListing::Top250English)
            }
            _ => Err(ScrapeError::listing(
                s,
                Some(anyhow::anyhow!(
                    "unsupported listing, choose from top250, bottom100, top250-english"
                )),
            )),
        }
    }
}

/// Movie ids in chart order. Entries whose id is not numeric are skipped.
pub fn parse_chart_ids(doc: &Html) -> Vec<u32> {
    doc.select(&RIBBON)
        .filter_map(|ribbon| {
            let tconst = ribbon.value().attr("data-tconst")?;
            let id = tconst.trim().trim_matches('t').parse().ok();
            if id.is_none() {
                debug!(tconst, "skipping chart entry with malformed id");
            }
            id
        })
        .collect()
}
