// ABOUTME: Field extractors for movie pages, one module per field plus record assembly.
// ABOUTME: Every field is located through an ordered cascade of layout-specific strategies.

//! Field extraction.
//!
//! Each submodule owns one field and the markup layouts it has been seen in.
//! Extractors only read the parsed document; they share no state and can be
//! run from any number of threads at once.
//!
//! Submodules:
//! - `cascade`: ordered, named strategy lists.
//! - `select`: selector and tree-navigation helpers.
//! - `assemble`: builds a `MovieRecord` from all field extractors.

pub mod assemble;
pub mod awards;
pub mod budget;
pub mod cascade;
pub mod certificate;
pub mod credits;
pub mod genres;
pub mod plot;
pub mod rating;
pub mod runtime;
pub mod select;
pub mod title;

pub use assemble::{extract_record, extract_record_from_html};
