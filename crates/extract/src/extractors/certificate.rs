// ABOUTME: German age-certificate ("FSK") extraction for current and legacy certificate markup.
// ABOUTME: Falls back to the NO_CERTIFICATE sentinel when no German rating is listed.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::extractors::cascade::{Cascade, Strategy};
use crate::extractors::select::{element_text, next_in_document};
use crate::record::NO_CERTIFICATE;

static CERTIFICATE_ITEM: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"li[data-testid="certificates-item"]"#).unwrap());
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static ANCHOR_WITH_HREF: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Certificate search links scoped to a German region code.
static GERMAN_CERTIFICATE_HREF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/search/title/?\?certificates=(?:de|imdb_wg|DE|Germany)(?::|%3A|%3a)[0-9]").unwrap()
});

pub static CERTIFICATE: Cascade<u8> = Cascade {
    field: "certificate",
    strategies: &[
        Strategy {
            name: "certificates-item",
            run: from_certificate_items,
        },
        Strategy {
            name: "certificate-search-link",
            run: from_search_links,
        },
    ],
};

/// German age certificate, or [`NO_CERTIFICATE`] when none is listed.
pub fn extract_certificate(doc: &Html) -> u8 {
    CERTIFICATE.run(doc).unwrap_or(NO_CERTIFICATE)
}

/// Current layout: a certificate list item mentioning Germany, value in the next anchor.
fn from_certificate_items(doc: &Html) -> Option<u8> {
    let item = doc
        .select(&CERTIFICATE_ITEM)
        .find(|li| element_text(*li).contains("Germany"))?;
    let anchor = next_in_document(item, &ANCHOR)?;
    parse_certificate(&element_text(anchor))
}

/// Legacy layout: the first German certificate search link, value after the colon.
fn from_search_links(doc: &Html) -> Option<u8> {
    let anchor = doc.select(&ANCHOR_WITH_HREF).find(|a| {
        a.value()
            .attr("href")
            .is_some_and(|href| GERMAN_CERTIFICATE_HREF.is_match(href))
    })?;
    let text = element_text(anchor);
    let value = text.split(':').nth(1)?;
    parse_certificate(value)
}

/// Parses "16" or "Germany:16".
pub fn parse_certificate(text: &str) -> Option<u8> {
    let value = text.rsplit(':').next().unwrap_or(text);
    value.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn legacy_search_link_inline() {
        let doc = Html::parse_document(
            r#"<li class="ipl-inline-list__item"> <a href="/search/title?certificates=DE:16">Germany:16</a>
                 (bw) </li>"#,
        );
        assert_eq!(extract_certificate(&doc), 16);
    }

    #[test]
    fn legacy_search_link_multiline() {
        let doc = Html::parse_document(
            r#"<li class="ipl-inline-list__item">
                   <a href="/search/title?certificates=DE:12">Germany:12</a>
               </li>"#,
        );
        assert_eq!(extract_certificate(&doc), 12);
    }

    #[test]
    fn current_certificate_items() {
        let doc = Html::parse_document(
            r#"<ul>
                <li data-testid="certificates-item"><span>France</span>
                    <ul><li><a href="/search/title/?certificates=FR:Tous+publics">Tous publics</a></li></ul></li>
                <li data-testid="certificates-item"><span>Germany</span>
                    <ul><li><a href="/search/title/?certificates=DE%3A16">16</a></li></ul></li>
            </ul>"#,
        );
        assert_eq!(
            (CERTIFICATE.strategy("certificates-item").unwrap().run)(&doc),
            Some(16)
        );
        assert_eq!(extract_certificate(&doc), 16);
    }

    #[test]
    fn current_item_falls_back_to_links_when_value_is_not_numeric() {
        let doc = Html::parse_document(
            r##"<li data-testid="certificates-item"><span>Germany</span><a href="#">pending</a></li>
               <a href="/search/title?certificates=DE:6">Germany:6</a>"##,
        );
        assert_eq!(extract_certificate(&doc), 6);
    }

    #[test]
    fn other_regions_are_ignored() {
        let doc = Html::parse_document(
            r#"<a href="/search/title?certificates=US:PG-13">United States:PG-13</a>
               <a href="/search/title?certificates=GB:12A">United Kingdom:12A</a>"#,
        );
        assert_eq!(extract_certificate(&doc), NO_CERTIFICATE);
    }

    #[test]
    fn no_certificate_is_sentinel() {
        let doc = Html::parse_document("<p>nothing</p>");
        assert_eq!(extract_certificate(&doc), 99);
    }

    #[test]
    fn parse_certificate_forms() {
        assert_eq!(parse_certificate("16"), Some(16));
        assert_eq!(parse_certificate("Germany:16"), Some(16));
        assert_eq!(parse_certificate(" 0 "), Some(0));
        assert_eq!(parse_certificate("Tous publics"), None);
    }
}
