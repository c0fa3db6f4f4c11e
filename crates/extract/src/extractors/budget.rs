// ABOUTME: Production budget extraction from the box-office section or the legacy "Budget:" heading.
// ABOUTME: Currency symbols, separators and the "(estimated)" note are stripped before parsing.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::extractors::cascade::{Cascade, Strategy};
use crate::extractors::select::{element_text, following_text};

static BOXOFFICE_BUDGET: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"li[data-testid="title-boxoffice-budget"]"#).unwrap());
static DIV: Lazy<Selector> = Lazy::new(|| Selector::parse("div").unwrap());
static H4: Lazy<Selector> = Lazy::new(|| Selector::parse("h4").unwrap());

pub static BUDGET: Cascade<u64> = Cascade {
    field: "budget",
    strategies: &[
        Strategy {
            name: "boxoffice-budget",
            run: from_boxoffice,
        },
        Strategy {
            name: "budget-heading",
            run: from_heading,
        },
    ],
};

pub fn extract_budget(doc: &Html) -> Option<u64> {
    BUDGET.run(doc)
}

fn from_boxoffice(doc: &Html) -> Option<u64> {
    let item = doc.select(&BOXOFFICE_BUDGET).next()?;
    let value = item.select(&DIV).next()?;
    parse_budget(&element_text(value))
}

fn from_heading(doc: &Html) -> Option<u64> {
    let heading = doc
        .select(&H4)
        .find(|h| element_text(*h).trim().starts_with("Budget"))?;
    parse_budget(&following_text(heading)?)
}

/// "$12,000,000 (estimated)" → 12000000. Anything left that is not an
/// integer after stripping gives `None`.
pub fn parse_budget(raw: &str) -> Option<u64> {
    raw.replace(&['$', '€', ','][..], "")
        .replace("(estimated)", "")
        .trim()
        .parse()
        .ok()
}
