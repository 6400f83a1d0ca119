//! Serde schemas for the raw scraped dataset documents
//!
//! Every field the scraper may omit is optional or defaults to empty; the
//! formatters decide what absence means per attribute. Only the attributes
//! the pipeline consumes are declared, unknown keys are ignored.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageRank {
    #[serde(default)]
    pub rank: f64,
}

/// A character document from the book dataset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawBookCharacter {
    pub name: String,
    pub male: Option<bool>,
    pub birth: Option<i64>,
    pub death: Option<i64>,
    pub culture: Option<String>,
    pub house: Option<String>,
    pub allegiances: Vec<String>,
    pub books: Vec<String>,
    pub titles: Vec<String>,
    pub pagerank: Option<PageRank>,
    pub children: Vec<String>,
    pub father: Option<String>,
    pub mother: Option<String>,
    pub spouse: Option<String>,
}

/// Per-character location sightings, a separate book-dataset document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCharacterLocations {
    pub name: String,
    pub locations: Vec<String>,
}

/// A noble house from the book dataset; only the region matters here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawHouse {
    pub name: String,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RawAge {
    #[serde(default)]
    pub age: i64,
}

/// A character document from the show dataset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawShowCharacter {
    pub name: String,
    pub gender: Option<String>,
    pub birth: Option<i64>,
    pub death: Option<i64>,
    pub age: Option<RawAge>,
    pub pagerank: Option<PageRank>,
    pub allegiances: Vec<String>,
    pub appearances: Vec<String>,
    pub cultures: Vec<String>,
    pub titles: Vec<String>,
    pub mother: Option<String>,
    pub father: Option<String>,
    pub spouse: Option<String>,
    pub lovers: Vec<String>,
    pub siblings: Vec<String>,
}

/// An entry in the show dataset's list of known bastards.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawBastard {
    pub name: String,
}

/// A battle from the show dataset, reduced to its commander rosters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawBattle {
    pub commanders_one: Vec<String>,
    pub commanders_two: Vec<String>,
}
