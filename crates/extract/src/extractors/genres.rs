// ABOUTME: Genre extraction from genre-search links, with legacy itemprop and /genre/ fallbacks.
// ABOUTME: Labels are trimmed and collected into a de-duplicated set.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::extractors::cascade::{Cascade, Strategy};
use crate::extractors::select::element_text;

static GENRE_SEARCH_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"a[href^="/search/title?genres"], a[href^="/search/title/?genres"]"#)
        .unwrap()
});
static ITEMPROP_GENRE_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"div[itemprop="genre"] a"#).unwrap());
static GENRE_PATH_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[href^="/genre/"]"#).unwrap());
static SPAN: Lazy<Selector> = Lazy::new(|| Selector::parse("span").unwrap());

pub static GENRES: Cascade<BTreeSet<String>> = Cascade {
    field: "genres",
    strategies: &[
        Strategy {
            name: "genre-search-links",
            run: from_search_links,
        },
        Strategy {
            name: "itemprop-genre",
            run: from_itemprop,
        },
        Strategy {
            name: "genre-path-links",
            run: from_genre_paths,
        },
    ],
};

pub fn extract_genres(doc: &Html) -> BTreeSet<String> {
    GENRES.run(doc).unwrap_or_default()
}

fn from_search_links(doc: &Html) -> Option<BTreeSet<String>> {
    collect(doc.select(&GENRE_SEARCH_LINK))
}

fn from_itemprop(doc: &Html) -> Option<BTreeSet<String>> {
    collect(doc.select(&ITEMPROP_GENRE_LINK))
}

fn from_genre_paths(doc: &Html) -> Option<BTreeSet<String>> {
    collect(doc.select(&GENRE_PATH_LINK))
}

/// Visible label of a genre link, preferring a nested `<span>`.
fn label(link: ElementRef<'_>) -> String {
    let text = match link.select(&SPAN).next() {
        Some(span) => element_text(span),
        None => element_text(link),
    };
    text.trim().to_string()
}

fn collect<'a>(links: impl Iterator<Item = ElementRef<'a>>) -> Option<BTreeSet<String>> {
    let genres: BTreeSet<String> = links.map(label).filter(|g| !g.is_empty()).collect();
    if genres.is_empty() {
        None
    } else {
        Some(genres)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn chip_links_with_nested_span() {
        let doc = Html::parse_document(
            r#"<div data-testid="genres">
                <a class="ipc-chip" href="/search/title?genres=action&amp;explore=title_type"><span class="ipc-chip__text">Action</span></a>
                <a class="ipc-chip" href="/search/title?genres=crime"><span class="ipc-chip__text"> Crime </span></a>
                <a class="ipc-chip" href="/search/title?genres=drama"><span class="ipc-chip__text">Drama</span></a>
            </div>
            <a href="/search/title?genres=drama&amp;ref_=tt_stry_gnr">Drama</a>"#,
        );
        assert_eq!(extract_genres(&doc), set(&["Action", "Crime", "Drama"]));
    }

    #[test]
    fn plain_links_without_span() {
        let doc = Html::parse_document(
            r#"<a href="/search/title/?genres=thriller"> Thriller </a>
               <a href="/search/title/?genres=x">   </a>"#,
        );
        assert_eq!(extract_genres(&doc), set(&["Thriller"]));
    }

    #[test]
    fn legacy_itemprop_block() {
        let doc = Html::parse_document(
            r#"<div class="see-more inline canwrap" itemprop="genre">
                <a href="/genre/Action">Action</a> | <a href="/genre/Sci-Fi">Sci-Fi</a>
            </div>"#,
        );
        assert_eq!(
            (GENRES.strategy("itemprop-genre").unwrap().run)(&doc),
            Some(set(&["Action", "Sci-Fi"]))
        );
    }

    #[test]
    fn legacy_genre_paths() {
        let doc = Html::parse_document(r#"<a href="/genre/Western">Western</a>"#);
        assert_eq!(extract_genres(&doc), set(&["Western"]));
    }

    #[test]
    fn no_links_is_empty_set() {
        let doc = Html::parse_document("<p>no genres</p>");
        assert!(extract_genres(&doc).is_empty());
    }
}
