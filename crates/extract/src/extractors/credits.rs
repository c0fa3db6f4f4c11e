// ABOUTME: Cast and director extraction from the full-credits listing.
// ABOUTME: Cast comes from the strided cast table, or from legacy itemprop="actor" cells.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::extractors::cascade::{Cascade, Strategy};
use crate::extractors::select::{element_text, next_in_document};
use crate::record::Role;

static CAST_LIST: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div#fullcredits_content table.cast_list").unwrap());
static ITEMPROP_ACTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"td[itemprop="actor"] a[itemprop="url"]"#).unwrap());
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static H4: Lazy<Selector> = Lazy::new(|| Selector::parse("h4").unwrap());
static TBODY: Lazy<Selector> = Lazy::new(|| Selector::parse("tbody").unwrap());

static PERSON_HREF: Lazy<Regex> = Lazy::new(|| Regex::new(r"/name/nm(\d+)").unwrap());

pub static ACTORS: Cascade<Vec<u32>> = Cascade {
    field: "actor",
    strategies: &[
        Strategy {
            name: "cast-list",
            run: from_cast_list,
        },
        Strategy {
            name: "itemprop-actor",
            run: from_itemprop_actors,
        },
    ],
};

/// Actor and director ids.
///
/// The `actor` entry is always present (possibly empty); `director` only
/// when the directors listing yields at least one id.
pub fn extract_persons(doc: &Html) -> BTreeMap<Role, Vec<u32>> {
    let mut persons = BTreeMap::new();
    persons.insert(Role::Actor, actor_ids(doc));
    let directors = director_ids(doc);
    if !directors.is_empty() {
        persons.insert(Role::Director, directors);
    }
    persons
}

/// Cast ids in billing order; empty when no strategy finds any.
pub fn actor_ids(doc: &Html) -> Vec<u32> {
    ACTORS.run(doc).unwrap_or_default()
}

/// One id per cast row. The portrait link and the name link of a row both
/// point at the actor, so the matches are taken two at a time.
fn from_cast_list(doc: &Html) -> Option<Vec<u32>> {
    let cast = doc.select(&CAST_LIST).next()?;
    let ids: Vec<u32> = cast
        .select(&ANCHOR)
        .filter_map(person_id)
        .step_by(2)
        .collect();
    non_empty(ids)
}

/// Older pages mark each cast member with a single microdata link.
fn from_itemprop_actors(doc: &Html) -> Option<Vec<u32>> {
    non_empty(doc.select(&ITEMPROP_ACTOR).filter_map(person_id).collect())
}

fn non_empty(ids: Vec<u32>) -> Option<Vec<u32>> {
    if ids.is_empty() {
        None
    } else {
        Some(ids)
    }
}

/// Director ids from the listing that follows the "Directed by" heading.
pub fn director_ids(doc: &Html) -> Vec<u32> {
    let Some(heading) = doc
        .select(&H4)
        .find(|h| element_text(*h).contains("Directed by"))
    else {
        return Vec::new();
    };
    let Some(body) = next_in_document(heading, &TBODY) else {
        return Vec::new();
    };
    body.select(&ANCHOR).filter_map(person_id).collect()
}

fn person_id(anchor: ElementRef<'_>) -> Option<u32> {
    let href = anchor.value().attr("href")?;
    PERSON_HREF.captures(href)?[1].parse().ok()
}
