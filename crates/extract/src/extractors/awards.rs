// ABOUTME: Awards table extraction, folding outcome/description cells into per-category entries.
// ABOUTME: State is carried per table; an unknown cell kind is a structural error.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractionError;
use crate::extractors::select::element_text;
use crate::record::AwardEntry;

static AWARDS_TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table.awards").unwrap());
static TD: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());
static B: Lazy<Selector> = Lazy::new(|| Selector::parse("b").unwrap());
static SPAN: Lazy<Selector> = Lazy::new(|| Selector::parse("span").unwrap());

const OUTCOME_CELL: &str = "title_award_outcome";
const DESCRIPTION_CELL: &str = "award_description";

pub type Awards = BTreeMap<String, Vec<AwardEntry>>;

/// Running (category, outcome) while walking one table's cells.
#[derive(Debug, Default)]
struct TableState {
    category: Option<String>,
    outcome: Option<String>,
}

/// Awards grouped by category, in table order.
pub fn extract_awards(doc: &Html) -> Result<Awards, ExtractionError> {
    let mut awards = Awards::new();
    for table in doc.select(&AWARDS_TABLE) {
        fold_table(table, &mut awards)?;
    }
    Ok(awards)
}

fn fold_table(table: ElementRef<'_>, awards: &mut Awards) -> Result<(), ExtractionError> {
    table
        .select(&TD)
        .try_fold(TableState::default(), |state, cell| match cell_kind(cell) {
            Some(OUTCOME_CELL) => Ok(TableState {
                outcome: Some(child_text(cell, &B, "outcome cell without <b>")?),
                category: Some(child_text(cell, &SPAN, "outcome cell without <span>")?),
            }),
            Some(DESCRIPTION_CELL) => {
                if let (Some(category), Some(outcome)) = (&state.category, &state.outcome) {
                    awards.entry(category.clone()).or_default().push(AwardEntry {
                        description: description(cell),
                        outcome: outcome.clone(),
                    });
                }
                Ok(state)
            }
            other => Err(ExtractionError::structure(
                "awards",
                format!("unexpected award cell class {:?}", other.unwrap_or("")),
            )),
        })
        .map(|_| ())
}

fn cell_kind<'a>(cell: ElementRef<'a>) -> Option<&'a str> {
    cell.value()
        .attr("class")
        .and_then(|classes| classes.split_whitespace().next())
}

fn child_text(
    cell: ElementRef<'_>,
    sel: &Selector,
    missing: &str,
) -> Result<String, ExtractionError> {
    cell.select(sel)
        .next()
        .map(|el| element_text(el).trim().to_string())
        .ok_or_else(|| ExtractionError::structure("awards", missing))
}

/// The description is the second line of the cell; the first holds only indentation.
fn description(cell: ElementRef<'_>) -> String {
    let text = element_text(cell);
    text.split('\n')
        .nth(1)
        .unwrap_or(&text)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(description: &str, outcome: &str) -> AwardEntry {
        AwardEntry {
            description: description.to_string(),
            outcome: outcome.to_string(),
        }
    }

    const OSCARS: &str = r#"
        <table class="awards" style="margin-bottom: 10px;">
          <tr>
            <td rowspan="2" class="title_award_outcome"><b>Won</b><br/><span class="award_category">Oscar</span></td>
            <td class="award_description">
                Best Performance by an Actor in a Supporting Role
                <br/><a href="/name/nm0005132/">Heath Ledger</a>
            </td>
          </tr>
          <tr>
            <td class="award_description">
                Best Achievement in Sound Editing
                <br/><a href="/name/nm0477524/">Richard King</a>
            </td>
          </tr>
          <tr>
            <td rowspan="1" class="title_award_outcome"><b>Nominated</b><br/><span class="award_category">Oscar</span></td>
            <td class="award_description">
                Best Achievement in Cinematography
            </td>
          </tr>
        </table>"#;

    #[test]
    fn entries_follow_running_outcome() {
        let doc = Html::parse_document(OSCARS);
        let awards = extract_awards(&doc).unwrap();
        assert_eq!(awards.len(), 1);
        assert_eq!(
            awards["Oscar"],
            vec![
                entry("Best Performance by an Actor in a Supporting Role", "Won"),
                entry("Best Achievement in Sound Editing", "Won"),
                entry("Best Achievement in Cinematography", "Nominated"),
            ]
        );
    }

    #[test]
    fn state_resets_between_tables() {
        let doc = Html::parse_document(
            r#"
            <table class="awards">
              <tr><td class="title_award_outcome"><b>Won</b><span>BAFTA Film Award</span></td>
                  <td class="award_description">
                  Best Special Visual Effects
                  </td></tr>
            </table>
            <table class="awards">
              <tr><td class="award_description">
                  Orphan description before any outcome
                  </td></tr>
              <tr><td class="title_award_outcome"><b>Nominated</b><span>Saturn Award</span></td>
                  <td class="award_description">
                  Best Action/Adventure/Thriller Film
                  </td></tr>
            </table>"#,
        );
        let awards = extract_awards(&doc).unwrap();
        assert_eq!(
            awards["BAFTA Film Award"],
            vec![entry("Best Special Visual Effects", "Won")]
        );
        assert_eq!(
            awards["Saturn Award"],
            vec![entry("Best Action/Adventure/Thriller Film", "Nominated")]
        );
        assert_eq!(awards.values().map(Vec::len).sum::<usize>(), 2);
    }

    #[test]
    fn unknown_cell_kind_is_structural_error() {
        let doc = Html::parse_document(
            r#"<table class="awards"><tr><td class="award_year">2009</td></tr></table>"#,
        );
        let err = extract_awards(&doc).unwrap_err();
        assert!(matches!(err, ExtractionError::Structure { field: "awards", .. }));
    }

    #[test]
    fn description_without_newline_uses_whole_text() {
        let doc = Html::parse_document(
            r#"<table class="awards"><tr>
                <td class="title_award_outcome"><b>Won</b><span>Grammy</span></td>
                <td class="award_description">Best Score Soundtrack</td>
            </tr></table>"#,
        );
        let awards = extract_awards(&doc).unwrap();
        assert_eq!(awards["Grammy"], vec![entry("Best Score Soundtrack", "Won")]);
    }

    #[test]
    fn no_tables_is_empty() {
        let doc = Html::parse_document("<p>no awards</p>");
        assert!(extract_awards(&doc).unwrap().is_empty());
    }
}
