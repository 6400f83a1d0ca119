//! Pipeline-wide configuration
//!
//! The formatters and uploaders depend on a handful of in-universe
//! constants (the "current" year of each dataset, the first show year, the
//! maximum believable age). These are passed around as an explicit
//! [`PipelineConfig`] value rather than living as process-wide globals, so
//! every stage that derives features from them can be exercised with
//! alternate values in tests.

use serde::{Deserialize, Serialize};

/// Which dataset a record or API resource belongs to.
///
/// The remote API exposes one resource collection per dataset, addressed by
/// the lowercase dataset name in the URL path.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::FromStr,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    /// The book continuity.
    #[display("book")]
    Book,
    /// The show continuity.
    #[display("show")]
    Show,
}

/// Constants shared across formatting, encoding, and uploading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    /// The in-universe year the book timeline has reached.
    pub current_year_book: i64,
    /// The in-universe year the show timeline has reached.
    pub current_year_show: i64,
    /// The in-universe year the show timeline begins.
    pub show_begin: i64,
    /// Records claiming a greater age are treated as data errors and
    /// dropped by the formatters.
    pub age_maximum: i64,
}

impl PipelineConfig {
    /// The current year of the given dataset's timeline.
    #[must_use]
    pub fn current_year(&self, dataset: Dataset) -> i64 {
        match dataset {
            Dataset::Book => self.current_year_book,
            Dataset::Show => self.current_year_show,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            current_year_book: 304,
            current_year_show: 305,
            show_begin: 298,
            age_maximum: 100,
        }
    }
}
