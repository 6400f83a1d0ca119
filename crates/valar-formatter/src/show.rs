//! Show-dataset formatter
//!
//! The show documents are sparser than the book ones, so the formatter
//! recovers missing birth years from the stated age or, failing that, from
//! the book record of the same name. Birth years in the future of the show
//! timeline are discarded as scrape errors.

use serde::{Deserialize, Serialize};
use valar_features::vocabulary::{build_vocabulary, to_indices};
use valar_model::{AttrValue, Entity, PipelineConfig};

use crate::{
    indices_attr, max_normalize,
    raw::{RawBastard, RawBattle, RawBookCharacter, RawShowCharacter},
};

/// Sorted vocabularies of the show dataset's categorical attributes.
#[derive(Debug, Clone, Serialize)]
pub struct ShowVocabularies {
    pub allegiances: Vec<String>,
    pub appearances: Vec<String>,
    pub cultures: Vec<String>,
    pub titles: Vec<String>,
}

/// A show character in the shape the encoder consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedShowCharacter {
    pub name: String,
    pub male: bool,
    pub birth: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death: Option<i64>,
    pub age: i64,
    pub is_bastard: bool,
    pub page_rank: f64,
    pub num_relatives: f64,
    pub num_commanded_battles: f64,
    pub allegiances: Vec<usize>,
    pub appearances: Vec<usize>,
    pub cultures: Vec<usize>,
    pub titles: Vec<usize>,
}

impl FormattedShowCharacter {
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
        e.insert("isBastard", AttrValue::Bool(self.is_bastard));
        e.insert("pageRank", AttrValue::Number(self.page_rank));
        e.insert("numRelatives", AttrValue::Number(self.num_relatives));
        e.insert(
            "numCommandedBattles",
            AttrValue::Number(self.num_commanded_battles),
        );
        e.insert("allegiances", indices_attr(&self.allegiances));
        e.insert("appearances", indices_attr(&self.appearances));
        e.insert("cultures", indices_attr(&self.cultures));
        e.insert("titles", indices_attr(&self.titles));
        e
    }
}

/// The formatter's full output: vocabularies plus the train/predict split.
#[derive(Debug, Clone)]
pub struct ShowFormatterOutput {
    pub vocabularies: ShowVocabularies,
    pub train: Vec<FormattedShowCharacter>,
    pub predict: Vec<FormattedShowCharacter>,
}

/// Formats the raw show dataset.
///
/// `book_characters` is the fallback source for missing birth years;
/// `bastards` and `battles` contribute the `isBastard` flag and the
/// commanded-battle count.
#[must_use]
pub fn format_show(
    characters: &[RawShowCharacter],
    book_characters: &[RawBookCharacter],
    bastards: &[RawBastard],
    battles: &[RawBattle],
    config: &PipelineConfig,
) -> ShowFormatterOutput {
    let vocabularies = ShowVocabularies {
        allegiances: build_vocabulary(characters, |c| as_strs(&c.allegiances)),
        appearances: build_vocabulary(characters, |c| as_strs(&c.appearances)),
        cultures: build_vocabulary(characters, |c| as_strs(&c.cultures)),
        titles: build_vocabulary(characters, |c| as_strs(&c.titles)),
    };

    let commanders: Vec<&str> = battles
        .iter()
        .flat_map(|b| {
            b.commanders_one
                .iter()
                .chain(&b.commanders_two)
                .map(String::as_str)
        })
        .collect();

    let mut formatted: Vec<_> = characters
        .iter()
        .filter_map(|c| {
            format_one(
                c,
                book_characters,
                bastards,
                &commanders,
                &vocabularies,
                config,
            )
        })
        .collect();

    max_normalize(&mut formatted, |c| &mut c.page_rank);
    max_normalize(&mut formatted, |c| &mut c.num_relatives);
    max_normalize(&mut formatted, |c| &mut c.num_commanded_battles);

    let (train, predict) = formatted.into_iter().partition(|c| c.death.is_some());
    ShowFormatterOutput {
        vocabularies,
        train,
        predict,
    }
}

#[expect(clippy::cast_precision_loss)]
fn format_one(
    c: &RawShowCharacter,
    book_characters: &[RawBookCharacter],
    bastards: &[RawBastard],
    commanders: &[&str],
    vocabularies: &ShowVocabularies,
    config: &PipelineConfig,
) -> Option<FormattedShowCharacter> {
    let birth = recover_birth(c, book_characters, config)?;
    if c.death.is_some_and(|death| death < birth) {
        return None;
    }
    let age = c.death.unwrap_or(config.current_year_show) - birth;
    if age > config.age_maximum {
        return None;
    }

    let num_relatives = c.lovers.len()
        + c.siblings.len()
        + usize::from(c.mother.is_some())
        + usize::from(c.father.is_some())
        + usize::from(c.spouse.is_some());
    let num_commanded = commanders.iter().filter(|name| **name == c.name).count();

    Some(FormattedShowCharacter {
        name: c.name.clone(),
        male: c.gender.as_deref() == Some("male"),
        birth,
        death: c.death,
        age,
        is_bastard: bastards.iter().any(|b| b.name == c.name),
        page_rank: c.pagerank.map_or(0.0, |p| p.rank),
        num_relatives: num_relatives as f64,
        num_commanded_battles: num_commanded as f64,
        allegiances: to_indices(as_strs(&c.allegiances), &vocabularies.allegiances),
        appearances: to_indices(as_strs(&c.appearances), &vocabularies.appearances),
        cultures: to_indices(as_strs(&c.cultures), &vocabularies.cultures),
        titles: to_indices(as_strs(&c.titles), &vocabularies.titles),
    })
}

/// Recovers a character's birth year: the stated one, else derived from the
/// stated age, else the book record's. Future birth years are scrape
/// errors and count as missing.
fn recover_birth(
    c: &RawShowCharacter,
    book_characters: &[RawBookCharacter],
    config: &PipelineConfig,
) -> Option<i64> {
    let birth = c.birth.or_else(|| {
        if let Some(age) = c.age {
            Some(c.death.unwrap_or(config.current_year_show) - age.age)
        } else {
            book_characters
                .iter()
                .find(|b| b.name == c.name)
                .and_then(|b| b.birth)
        }
    })?;
    (birth <= config.current_year_show).then_some(birth)
}

fn as_strs(values: &[String]) -> Vec<&str> {
    values.iter().map(String::as_str).collect()
}
