// ABOUTME: Storyline and synopsis extraction across the summary, storyline and plot-summary layouts.
// ABOUTME: Text is stripped of newlines and double quotes before it is returned.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::error::ExtractionError;
use crate::extractors::cascade::{Cascade, Strategy};
use crate::extractors::select::{element_text, element_text_with};

static SUMMARIES: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"div[data-testid="sub-section-summaries"]"#).unwrap());
static TITLE_STORY_LINE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div#titleStoryLine div p span").unwrap());
static STORYLINE_WRAPPER: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"div[data-testid^="storyline-plot-summary"] div div"#).unwrap()
});
static PLOT_SUMMARIES: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"ul[id="plot-summaries-content"]"#).unwrap());
static CANWRAP: Lazy<Selector> = Lazy::new(|| Selector::parse("div.inline.canwrap p").unwrap());
static SYNOPSIS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"div[data-testid="sub-section-synopsis"]"#).unwrap());
static PLOT_SYNOPSIS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("ul#plot-synopsis-content").unwrap());
static P: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

pub static STORYLINE: Cascade<String> = Cascade {
    field: "storyline",
    strategies: &[
        Strategy {
            name: "summaries-sub-section",
            run: storyline_from_summaries,
        },
        Strategy {
            name: "title-story-line",
            run: storyline_from_title_story_line,
        },
        Strategy {
            name: "storyline-plot-summary",
            run: storyline_from_wrapper,
        },
        Strategy {
            name: "plot-summaries-list",
            run: storyline_from_summary_list,
        },
        Strategy {
            name: "canwrap",
            run: storyline_from_canwrap,
        },
    ],
};

pub static SYNOPSIS_CASCADE: Cascade<String> = Cascade {
    field: "synopsis",
    strategies: &[
        Strategy {
            name: "synopsis-sub-section",
            run: synopsis_from_sub_section,
        },
        Strategy {
            name: "plot-synopsis-list",
            run: synopsis_from_list,
        },
    ],
};

/// Storyline text. Errors when no layout carries one.
pub fn extract_storyline(doc: &Html) -> Result<String, ExtractionError> {
    STORYLINE
        .run(doc)
        .map(|s| clean_text(&s))
        .ok_or_else(|| ExtractionError::missing("storyline", "no storyline section matched"))
}

/// Synopsis text, empty when the page has none.
pub fn extract_synopsis(doc: &Html) -> String {
    SYNOPSIS_CASCADE
        .run(doc)
        .map(|s| clean_text(&s))
        .unwrap_or_default()
}

/// Drops newlines and double quotes, then trims.
pub fn clean_text(raw: &str) -> String {
    raw.replace('\n', "").replace('"', "").trim().to_string()
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn storyline_from_summaries(doc: &Html) -> Option<String> {
    let section = doc.select(&SUMMARIES).next()?;
    non_empty(element_text_with(section, " "))
}

fn storyline_from_title_story_line(doc: &Html) -> Option<String> {
    let span = doc.select(&TITLE_STORY_LINE).next()?;
    non_empty(element_text(span).trim().to_string())
}

fn storyline_from_wrapper(doc: &Html) -> Option<String> {
    let inner = doc.select(&STORYLINE_WRAPPER).next()?;
    non_empty(element_text(inner).trim().to_string())
}

fn storyline_from_summary_list(doc: &Html) -> Option<String> {
    let list = doc.select(&PLOT_SUMMARIES).next()?;
    let summaries: Vec<String> = list.select(&P).map(element_text).collect();
    non_empty(summaries.join("; "))
}

fn storyline_from_canwrap(doc: &Html) -> Option<String> {
    let p = doc.select(&CANWRAP).next()?;
    non_empty(element_text(p))
}

fn synopsis_from_sub_section(doc: &Html) -> Option<String> {
    let section = doc.select(&SYNOPSIS).next()?;
    non_empty(element_text(section))
}

fn synopsis_from_list(doc: &Html) -> Option<String> {
    let list = doc.select(&PLOT_SYNOPSIS).next()?;
    non_empty(element_text(list))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn summaries_sub_section_is_joined_with_spaces() {
        let doc = Html::parse_document(
            r#"<div data-testid="sub-section-summaries"><ul>
                <li><div>When the menace known as the Joker wreaks havoc.</div></li><li><div>Batman raises the stakes.</div></li>
            </ul></div>"#,
        );
        let storyline = extract_storyline(&doc).unwrap();
        assert!(storyline.starts_with("When the menace known as the Joker"));
        assert!(storyline.contains("havoc. Batman"));
        assert!(!storyline.contains('\n'));
    }

    #[test]
    fn legacy_title_story_line() {
        let doc = Html::parse_document(
            r#"<div id="titleStoryLine"><h2>Storyline</h2>
                <div class="inline canwrap"><p><span>Set within a year after the events of "Batman Begins".
                </span><em>Written by</em></p></div></div>"#,
        );
        assert_eq!(
            extract_storyline(&doc).unwrap(),
            "Set within a year after the events of Batman Begins."
        );
    }

    #[test]
    fn storyline_plot_summary_wrapper() {
        let doc = Html::parse_document(
            r#"<div data-testid="storyline-plot-summary"><div><div>A thief steals secrets.</div></div></div>"#,
        );
        assert_eq!(extract_storyline(&doc).unwrap(), "A thief steals secrets.");
    }

    #[test]
    fn plot_summary_list_joined_with_semicolons() {
        let doc = Html::parse_document(
            r#"<ul id="plot-summaries-content">
                <li><p>First summary.</p></li>
                <li><p>Second summary.</p></li>
            </ul>"#,
        );
        assert_eq!(
            (STORYLINE.strategy("plot-summaries-list").unwrap().run)(&doc),
            Some("First summary.; Second summary.".to_string())
        );
    }

    #[test]
    fn missing_storyline_is_an_error() {
        let doc = Html::parse_document("<p>nothing</p>");
        assert_eq!(
            extract_storyline(&doc),
            Err(ExtractionError::missing(
                "storyline",
                "no storyline section matched"
            ))
        );
    }

    #[test]
    fn synopsis_is_cleaned() {
        let doc = Html::parse_document(
            "<div data-testid=\"sub-section-synopsis\">\n  The \"Joker\" robs a mob bank.\n</div>",
        );
        assert_eq!(extract_synopsis(&doc), "The Joker robs a mob bank.");
    }

    #[test]
    fn legacy_synopsis_list() {
        let doc = Html::parse_document(
            r#"<ul id="plot-synopsis-content"><li>Gotham is quiet.</li></ul>"#,
        );
        assert_eq!(extract_synopsis(&doc), "Gotham is quiet.");
    }

    #[test]
    fn missing_synopsis_is_empty() {
        let doc = Html::parse_document("<p>nothing</p>");
        assert_eq!(extract_synopsis(&doc), "");
    }

    #[test]
    fn clean_text_strips_newlines_and_quotes() {
        assert_eq!(clean_text("  \"a\"\nb  "), "ab");
    }
}
