// ABOUTME: MovieRecord struct holding the facts extracted from one movie page.
// ABOUTME: Includes Ratings, AwardEntry, Role and the title page URL helper.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Age-certificate value meaning "no German certificate was found".
pub const NO_CERTIFICATE: u8 = 99;

/// Credit role a person id is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Actor,
    Director,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Actor => "actor",
            Role::Director => "director",
        };
        write!(f, "{}", s)
    }
}

/// Aggregate user rating. Either half may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Ratings {
    /// Average score on a 0-10 scale.
    pub average: Option<f64>,
    /// Absolute number of votes.
    pub count: Option<u64>,
}

impl Ratings {
    pub fn is_empty(&self) -> bool {
        self.average.is_none() && self.count.is_none()
    }
}

/// One line of an awards table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardEntry {
    pub description: String,
    /// "Won", "Nominated" and so on.
    pub outcome: String,
}

/// The facts extracted from one movie page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: u32,
    pub title: String,
    pub year: i32,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// German age certificate, [`NO_CERTIFICATE`] when absent.
    pub certificate: u8,
    pub storyline: String,
    pub synopsis: String,
    pub genres: BTreeSet<String>,
    pub persons: BTreeMap<Role, Vec<u32>>,
    pub awards: BTreeMap<String, Vec<AwardEntry>>,
    pub ratings: Ratings,
    pub budget: Option<u64>,
}

impl MovieRecord {
    /// Person ids listed under `role`; empty when the role was not found.
    pub fn persons_in(&self, role: Role) -> &[u32] {
        self.persons.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Builds the title page URL for `id`, zero padded to seven digits.
pub fn title_url(base_url: &str, id: u32) -> String {
    format!("{}{:07}/", base_url, id)
}
