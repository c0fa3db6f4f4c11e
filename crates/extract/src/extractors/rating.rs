// ABOUTME: Aggregate rating extraction from JSON-LD, class-prefixed widgets, microdata, or the hero rating bar.
// ABOUTME: Normalizes "9/10" scores and "12K"/"1.2M"/"2,700,000"/"1.139.543" vote counts.

//! Aggregate rating extraction.
//!
//! Four layouts are known, tried newest first:
//! 1. the `application/ld+json` block's `aggregateRating` object
//! 2. `AggregateRatingButton__*` elements (class names carry a generated
//!    suffix, so they are matched by prefix)
//! 3. `itemprop="ratingValue"` / `itemprop="ratingCount"` microdata
//! 4. the `hero-rating-bar__aggregate-rating__score` widget, whose vote count
//!    sits in the next sibling element
//!
//! Every strategy yields the raw strings; [`normalize`] turns them into
//! [`Ratings`].

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::Value;

use crate::extractors::cascade::{Cascade, Strategy};
use crate::extractors::select::{element_text, first_text, next_element_sibling};
use crate::record::Ratings;

static LD_JSON: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());
static BUTTON_SCORE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"span[class^="AggregateRatingButton__RatingScore"]"#).unwrap()
});
static BUTTON_COUNT: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"div[class^="AggregateRatingButton__TotalRatingAmount"]"#).unwrap()
});
static ITEMPROP_VALUE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"span[itemprop="ratingValue"]"#).unwrap());
static ITEMPROP_COUNT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"span[itemprop="ratingCount"]"#).unwrap());
static HERO_SCORE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"div[data-testid="hero-rating-bar__aggregate-rating__score"]"#).unwrap()
});

/// Score and count as they appear in the markup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRating {
    pub score: Option<String>,
    pub count: Option<String>,
}

pub static RATING: Cascade<RawRating> = Cascade {
    field: "ratings",
    strategies: &[
        Strategy {
            name: "ld-json",
            run: from_ld_json,
        },
        Strategy {
            name: "class-prefix",
            run: from_class_prefix,
        },
        Strategy {
            name: "microdata",
            run: from_microdata,
        },
        Strategy {
            name: "hero-rating-bar",
            run: from_hero_rating_bar,
        },
    ],
};

/// Aggregate rating; both halves are `None` when no layout matches.
pub fn extract_ratings(doc: &Html) -> Ratings {
    RATING
        .run(doc)
        .map(|raw| normalize(&raw))
        .unwrap_or_default()
}

fn from_ld_json(doc: &Html) -> Option<RawRating> {
    let script = doc.select(&LD_JSON).next()?;
    let value: Value = serde_json::from_str(&element_text(script)).ok()?;
    let aggregate = value.get("aggregateRating")?;
    let score = aggregate.get("ratingValue").and_then(json_scalar)?;
    Some(RawRating {
        score: Some(score),
        count: aggregate.get("ratingCount").and_then(json_scalar),
    })
}

fn json_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn from_class_prefix(doc: &Html) -> Option<RawRating> {
    let score = first_text(doc, &BUTTON_SCORE)?;
    let count = first_text(doc, &BUTTON_COUNT)?;
    Some(RawRating {
        score: Some(score),
        count: Some(count),
    })
}

fn from_microdata(doc: &Html) -> Option<RawRating> {
    let score = first_text(doc, &ITEMPROP_VALUE)?;
    let count = first_text(doc, &ITEMPROP_COUNT)?;
    Some(RawRating {
        score: Some(score),
        count: Some(count),
    })
}

fn from_hero_rating_bar(doc: &Html) -> Option<RawRating> {
    let score = doc.select(&HERO_SCORE).next()?;
    let count = next_element_sibling(score).map(|el| element_text(el).trim().to_string());
    Some(RawRating {
        score: Some(element_text(score).trim().to_string()),
        count,
    })
}

/// Converts raw markup strings into a [`Ratings`] value.
pub fn normalize(raw: &RawRating) -> Ratings {
    Ratings {
        average: raw.score.as_deref().and_then(parse_score),
        count: raw.count.as_deref().and_then(parse_count),
    }
}

/// "9.0/10" → 9.0, "8,5" → 8.5.
pub fn parse_score(raw: &str) -> Option<f64> {
    let numerator = raw.split('/').next().unwrap_or(raw).trim();
    if numerator.is_empty() {
        return None;
    }
    numerator.replace(',', ".").parse().ok()
}

/// "12K" → 12000, "1.2M" → 1200000, "2,700,000" → 2700000,
/// "1.139.543" → 1139543.
pub fn parse_count(raw: &str) -> Option<u64> {
    let cleaned = raw.trim().replace(',', "");
    if let Some(thousands) = cleaned.strip_suffix('K') {
        return scaled(thousands, 1_000.0);
    }
    if let Some(millions) = cleaned.strip_suffix('M') {
        return scaled(millions, 1_000_000.0);
    }
    strip_dot_grouping(&cleaned).parse().ok()
}

/// Drops `.` thousands separators as written on German-locale pages.
///
/// Without a unit suffix a count has no fraction, so the dots are grouping
/// when there are several of them or every group after one is three digits.
fn strip_dot_grouping(number: &str) -> String {
    let mut groups = number.split('.');
    let head = groups.next().unwrap_or_default();
    let tail: Vec<&str> = groups.collect();
    let grouped = tail.len() > 1 || tail.iter().all(|g| g.len() == 3);
    if tail.is_empty() || !grouped {
        return number.to_string();
    }
    let mut joined = head.to_string();
    for group in tail {
        joined.push_str(group);
    }
    joined
}

fn scaled(number: &str, factor: f64) -> Option<u64> {
    let value: f64 = number.trim().parse().ok()?;
    if value.is_sign_negative() || !value.is_finite() {
        return None;
    }
    Some((value * factor).round() as u64)
}
