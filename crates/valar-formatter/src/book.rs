//! Book-dataset formatter

use serde::{Deserialize, Serialize};
use valar_features::{
    sanitized_eq,
    vocabulary::{build_vocabulary, to_indices},
};
use valar_model::{AttrValue, Entity, PipelineConfig};

use crate::{
    indices_attr, max_normalize,
    raw::{RawBookCharacter, RawCharacterLocations, RawHouse},
    vocab_index,
};

/// Sorted vocabularies of the book dataset's categorical attributes.
#[derive(Debug, Clone, Serialize)]
pub struct BookVocabularies {
    pub allegiances: Vec<String>,
    pub books: Vec<String>,
    pub cultures: Vec<String>,
    pub houses: Vec<String>,
    pub locations: Vec<String>,
    pub regions: Vec<String>,
    pub titles: Vec<String>,
}

/// A book character in the shape the encoder consumes.
///
/// Multi-valued categoricals are vocabulary index sequences; single-valued
/// ones (`culture`, `house`, `houseRegion`) are a single index with `-1`
/// for absent or unknown values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedBookCharacter {
    pub name: String,
    pub male: bool,
    pub birth: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death: Option<i64>,
    pub age: i64,
    pub page_rank: f64,
    pub num_relatives: f64,
    pub allegiances: Vec<usize>,
    pub books: Vec<usize>,
    pub culture: i64,
    pub house: i64,
    pub house_region: i64,
    pub locations: Vec<usize>,
    pub titles: Vec<usize>,
}

impl FormattedBookCharacter {
    /// Converts into the dynamic record shape the encoder reads.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn to_entity(&self) -> Entity {
        let mut e = Entity::new();
        e.insert("name", AttrValue::Str(self.name.clone()));
        e.insert("male", AttrValue::Bool(self.male));
        e.insert("birth", AttrValue::Number(self.birth as f64));
        if let Some(death) = self.death {
            e.insert("death", AttrValue::Number(death as f64));
        }
        e.insert("age", AttrValue::Number(self.age as f64));
        e.insert("pageRank", AttrValue::Number(self.page_rank));
        e.insert("numRelatives", AttrValue::Number(self.num_relatives));
        e.insert("allegiances", indices_attr(&self.allegiances));
        e.insert("books", indices_attr(&self.books));
        e.insert("culture", AttrValue::Number(self.culture as f64));
        e.insert("house", AttrValue::Number(self.house as f64));
        e.insert("houseRegion", AttrValue::Number(self.house_region as f64));
        e.insert("locations", indices_attr(&self.locations));
        e.insert("titles", indices_attr(&self.titles));
        e
    }
}

/// The formatter's full output: vocabularies plus the train/predict split.
#[derive(Debug, Clone)]
pub struct BookFormatterOutput {
    pub vocabularies: BookVocabularies,
    /// Dead characters, with known lifespans, used for training.
    pub train: Vec<FormattedBookCharacter>,
    /// Alive characters whose survival will be predicted.
    pub predict: Vec<FormattedBookCharacter>,
}

/// Formats the raw book dataset.
///
/// Characters without a birth year or with a death before their birth are
/// dropped, as are ages beyond `config.age_maximum`. `pageRank` and
/// `numRelatives` are max-normalized over the surviving characters before
/// the split.
#[must_use]
pub fn format_book(
    characters: &[RawBookCharacter],
    character_locations: &[RawCharacterLocations],
    houses: &[RawHouse],
    config: &PipelineConfig,
) -> BookFormatterOutput {
    let vocabularies = BookVocabularies {
        allegiances: build_vocabulary(characters, |c| as_strs(&c.allegiances)),
        books: build_vocabulary(characters, |c| as_strs(&c.books)),
        cultures: build_vocabulary(characters, |c| opt_str(c.culture.as_deref())),
        houses: build_vocabulary(characters, |c| opt_str(c.house.as_deref())),
        locations: build_vocabulary(character_locations, |l| as_strs(&l.locations)),
        regions: build_vocabulary(houses, |h| opt_str(h.region.as_deref())),
        titles: build_vocabulary(characters, |c| as_strs(&c.titles)),
    };

    let mut formatted: Vec<_> = characters
        .iter()
        .filter_map(|c| format_one(c, character_locations, houses, &vocabularies, config))
        .collect();

    max_normalize(&mut formatted, |c| &mut c.num_relatives);
    max_normalize(&mut formatted, |c| &mut c.page_rank);

    let (train, predict) = formatted.into_iter().partition(|c| c.death.is_some());
    BookFormatterOutput {
        vocabularies,
        train,
        predict,
    }
}

#[expect(clippy::cast_precision_loss)]
fn format_one(
    c: &RawBookCharacter,
    character_locations: &[RawCharacterLocations],
    houses: &[RawHouse],
    vocabularies: &BookVocabularies,
    config: &PipelineConfig,
) -> Option<FormattedBookCharacter> {
    let birth = c.birth?;
    if c.death.is_some_and(|death| death < birth) {
        return None;
    }
    let age = c.death.unwrap_or(config.current_year_book) - birth;
    if age > config.age_maximum {
        return None;
    }

    let locations = character_locations
        .iter()
        .find(|l| l.name == c.name)
        .map_or(&[][..], |l| &l.locations[..]);
    let house_region = houses
        .iter()
        .find(|h| sanitized_eq(Some(&h.name), c.house.as_deref()))
        .and_then(|h| h.region.as_deref());
    let num_relatives = c.children.len()
        + usize::from(c.father.is_some())
        + usize::from(c.mother.is_some())
        + usize::from(c.spouse.is_some());

    Some(FormattedBookCharacter {
        name: c.name.clone(),
        male: c.male.unwrap_or(false),
        birth,
        death: c.death,
        age,
        page_rank: c.pagerank.map_or(0.0, |p| p.rank),
        num_relatives: num_relatives as f64,
        allegiances: to_indices(as_strs(&c.allegiances), &vocabularies.allegiances),
        books: to_indices(as_strs(&c.books), &vocabularies.books),
        culture: vocab_index(&vocabularies.cultures, c.culture.as_deref()),
        house: vocab_index(&vocabularies.houses, c.house.as_deref()),
        house_region: vocab_index(&vocabularies.regions, house_region),
        locations: to_indices(as_strs(locations), &vocabularies.locations),
        titles: to_indices(as_strs(&c.titles), &vocabularies.titles),
    })
}

fn as_strs(values: &[String]) -> Vec<&str> {
    values.iter().map(String::as_str).collect()
}

fn opt_str(value: Option<&str>) -> Vec<&str> {
    value.into_iter().collect()
}
