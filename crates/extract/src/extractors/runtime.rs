// ABOUTME: Runtime extraction in minutes via "(N min)" labels, technical specs, or the legacy <time> tag.
// ABOUTME: The label strategy returns the longest of several listed cuts.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::extractors::cascade::{Cascade, Strategy};
use crate::extractors::select::{element_text, first_text};

static SPAN: Lazy<Selector> = Lazy::new(|| Selector::parse("span").unwrap());
static TECHSPEC_RUNTIME: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"li[data-testid="title-techspec_runtime"]"#).unwrap());
static TABLE_ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("table tr").unwrap());
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td, th").unwrap());
static TIME: Lazy<Selector> = Lazy::new(|| Selector::parse("time").unwrap());

static MIN_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((\d+)\s+min\)").unwrap());
static UNIT_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\((\d+)\s*(min|minutes|h|hr|hours?)\)").unwrap());
static HOURS_MINUTES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(\d+)\s*h)?\s*(?:(\d+)\s*min)?$").unwrap());

pub static RUNTIME: Cascade<u32> = Cascade {
    field: "runtime",
    strategies: &[
        Strategy {
            name: "min-labels",
            run: from_min_labels,
        },
        Strategy {
            name: "technical-details",
            run: from_technical_details,
        },
        Strategy {
            name: "time-element",
            run: from_time_element,
        },
    ],
};

pub fn extract_runtime(doc: &Html) -> Option<u32> {
    RUNTIME.run(doc)
}

/// Longest of all "(N min)" span labels; regional cuts list one each.
fn from_min_labels(doc: &Html) -> Option<u32> {
    doc.select(&SPAN)
        .filter_map(|span| {
            MIN_LABEL
                .captures(&element_text(span))
                .and_then(|caps| caps[1].parse::<u32>().ok())
        })
        .max()
}

fn from_technical_details(doc: &Html) -> Option<u32> {
    if let Some(value) = first_text(doc, &TECHSPEC_RUNTIME).and_then(|t| parse_unit_group(&t)) {
        return Some(value);
    }

    doc.select(&TABLE_ROW).find_map(|row| {
        let mut cells = row.select(&CELL);
        let label = element_text(cells.next()?);
        if !label.trim().starts_with("Runtime") {
            return None;
        }
        cells.find_map(|cell| parse_unit_group(&element_text(cell)))
    })
}

fn from_time_element(doc: &Html) -> Option<u32> {
    first_text(doc, &TIME).and_then(|t| parse_hours_minutes(&t))
}

/// Minutes from the first "(N unit)" segment, e.g. "2h 32m (152 min)".
/// Hour counts too large to express in minutes give `None`.
pub fn parse_unit_group(text: &str) -> Option<u32> {
    let caps = UNIT_GROUP.captures(text)?;
    let amount: u32 = caps[1].parse().ok()?;
    if caps[2].to_ascii_lowercase().starts_with('h') {
        amount.checked_mul(60)
    } else {
        Some(amount)
    }
}

/// Minutes from "152 min", "2h 32min" or "2h".
pub fn parse_hours_minutes(text: &str) -> Option<u32> {
    let caps = HOURS_MINUTES.captures(text.trim())?;
    let hours = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
    let minutes = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
    match (hours, minutes) {
        (None, None) => None,
        (h, m) => h.unwrap_or(0).checked_mul(60)?.checked_add(m.unwrap_or(0)),
    }
}
