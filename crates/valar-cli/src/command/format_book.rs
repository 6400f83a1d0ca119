use anyhow::Context as _;
use valar_formatter::{
    format_book,
    raw::{RawBookCharacter, RawCharacterLocations, RawHouse},
};

use super::{ConfigArg, StoreArg};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct FormatBookArg {
    #[clap(flatten)]
    store: StoreArg,
    #[clap(flatten)]
    config: ConfigArg,
}

pub(crate) fn run(arg: &FormatBookArg) -> anyhow::Result<()> {
    let store = arg.store.store();
    let config = arg.config.config();

    let characters: Vec<RawBookCharacter> = store
        .load("book/characters")
        .context("failed to load the raw book characters")?;
    let character_locations: Vec<RawCharacterLocations> = store
        .load("book/characterLocations")
        .context("failed to load the book character locations")?;
    let houses: Vec<RawHouse> = store
        .load("book/houses")
        .context("failed to load the book houses")?;

    let out = format_book(&characters, &character_locations, &houses, &config);

    let vocabularies = [
        ("allegiances", &out.vocabularies.allegiances),
        ("books", &out.vocabularies.books),
        ("cultures", &out.vocabularies.cultures),
        ("houses", &out.vocabularies.houses),
        ("locations", &out.vocabularies.locations),
        ("regions", &out.vocabularies.regions),
        ("titles", &out.vocabularies.titles),
    ];
    for (name, vocabulary) in vocabularies {
        store
            .write(&format!("vocab/book/{name}"), vocabulary)
            .with_context(|| format!("failed to write the {name} vocabulary"))?;
    }
    store
        .write("ml-data/book/chars-to-train", &out.train)
        .context("failed to write the training characters")?;
    store
        .write("ml-data/book/chars-to-predict", &out.predict)
        .context("failed to write the prediction characters")?;

    let num_dead = out.train.len();
    let num_alive = out.predict.len();
    println!(
        "characters    : {} ({num_alive} alive, {num_dead} dead)",
        num_dead + num_alive
    );
    for (name, vocabulary) in vocabularies {
        println!("{name:<14}: {}", vocabulary.len());
    }
    let births = out.train.iter().chain(&out.predict).map(|c| c.birth);
    if let (Some(min), Some(max)) = (births.clone().min(), births.max()) {
        println!("date of birth : {min} to {max}");
    }
    let deaths = out.train.iter().filter_map(|c| c.death);
    if let (Some(min), Some(max)) = (deaths.clone().min(), deaths.max()) {
        println!("date of death : {min} to {max}");
    }
    let ages: Vec<i64> = out.train.iter().map(|c| c.age).collect();
    if let Some(max_age) = ages.iter().max() {
        #[expect(clippy::cast_precision_loss)]
        let average = ages.iter().sum::<i64>() as f64 / ages.len() as f64;
        println!("age           : maximum {max_age}, average {average:.1}");
    }
    Ok(())
}
