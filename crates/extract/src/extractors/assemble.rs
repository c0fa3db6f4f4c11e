// ABOUTME: Record assembly: runs every field extractor over one parsed page and builds a MovieRecord.
// ABOUTME: Title and year failures are fatal; optional fields degrade to their defaults with a warning.

use scraper::Html;
use tracing::warn;

use crate::error::ExtractionError;
use crate::extractors::{awards, budget, certificate, credits, genres, plot, rating, runtime, title};
use crate::record::{MovieRecord, Role};

/// Extracts one [`MovieRecord`] from a parsed page.
///
/// Pure function of `(id, doc)`: the same inputs always give an equal record.
///
/// # Errors
///
/// Fails when the title or year cannot be found or parsed, and when an
/// awards table contains a cell of an unknown kind.
pub fn extract_record(id: u32, doc: &Html) -> Result<MovieRecord, ExtractionError> {
    let title = title::extract_title(doc)?;
    let year = title::extract_year(doc)?;

    let runtime = runtime::extract_runtime(doc);
    if runtime.is_none() {
        warn!(id, field = "runtime", "no runtime found");
    }

    let certificate = certificate::extract_certificate(doc);

    let storyline = plot::extract_storyline(doc).unwrap_or_else(|err| {
        warn!(id, error = %err, "storyline missing, using empty text");
        String::new()
    });

    let synopsis = plot::extract_synopsis(doc);
    if synopsis.is_empty() {
        warn!(id, field = "synopsis", "no synopsis found");
    }

    let genres = genres::extract_genres(doc);
    if genres.is_empty() {
        warn!(id, field = "genres", "no genres found");
    }

    let persons = credits::extract_persons(doc);
    if persons.get(&Role::Actor).map_or(true, Vec::is_empty) {
        warn!(id, field = "persons", "no cast listing found");
    }

    let awards = awards::extract_awards(doc)?;

    let ratings = rating::extract_ratings(doc);
    if ratings.is_empty() {
        warn!(id, field = "ratings", "no aggregate rating found");
    }

    let budget = budget::extract_budget(doc);

    Ok(MovieRecord {
        id,
        title,
        year,
        runtime,
        certificate,
        storyline,
        synopsis,
        genres,
        persons,
        awards,
        ratings,
        budget,
    })
}

/// Parses `html` and extracts a record from it.
pub fn extract_record_from_html(id: u32, html: &str) -> Result<MovieRecord, ExtractionError> {
    let doc = Html::parse_document(html);
    extract_record(id, &doc)
}
