// ABOUTME: Title and release-year extraction from the page's og:title descriptor.
// ABOUTME: Handles "(Video 2020)" decorations and TV-series year ranges.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::error::ExtractionError;
use crate::extractors::select::first_attr;

static OG_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());

/// Media-type labels that can precede the year, e.g. "TV Series 2008–2013".
static LABELLED_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:TV (?:Series|Mini[- ]Series|Movie|Special|Short)|Video Game|Podcast Series)\s+(\d{4})")
        .unwrap()
});

/// Reads the raw "Title (Year)" descriptor.
pub fn descriptor(doc: &Html) -> Result<String, ExtractionError> {
    first_attr(doc, &OG_TITLE, "content")
        .ok_or_else(|| ExtractionError::missing("title", "no og:title meta tag"))
}

/// Original title: everything before the first parenthesis.
pub fn extract_title(doc: &Html) -> Result<String, ExtractionError> {
    Ok(parse_title(&descriptor(doc)?))
}

/// Release year from the last parenthesis group of the descriptor.
pub fn extract_year(doc: &Html) -> Result<i32, ExtractionError> {
    let raw = descriptor(doc)
        .map_err(|_| ExtractionError::missing("year", "no og:title meta tag"))?;
    parse_year(&raw)
}

pub fn parse_title(raw: &str) -> String {
    raw.split('(').next().unwrap_or("").trim_end().to_string()
}

/// Parses the year out of a descriptor such as
/// `"Bloodywood (The Documentary) (Video 2020) - IMDb"`.
pub fn parse_year(raw: &str) -> Result<i32, ExtractionError> {
    let last_group = raw
        .rsplit('(')
        .next()
        .and_then(|tail| tail.split(')').next())
        .unwrap_or("");
    let candidate = last_group.replace("Video ", "");
    let candidate = candidate.trim();

    if let Ok(year) = candidate.parse::<i32>() {
        return Ok(year);
    }
    if let Some(caps) = LABELLED_YEAR.captures(candidate) {
        if let Ok(year) = caps[1].parse::<i32>() {
            return Ok(year);
        }
    }
    Err(ExtractionError::unparseable("year", last_group))
}
