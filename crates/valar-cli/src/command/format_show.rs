use anyhow::Context as _;
use valar_formatter::{
    format_show,
    raw::{RawBastard, RawBattle, RawBookCharacter, RawShowCharacter},
};

use super::{ConfigArg, StoreArg};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct FormatShowArg {
    #[clap(flatten)]
    store: StoreArg,
    #[clap(flatten)]
    config: ConfigArg,
}

pub(crate) fn run(arg: &FormatShowArg) -> anyhow::Result<()> {
    let store = arg.store.store();
    let config = arg.config.config();

    let characters: Vec<RawShowCharacter> = store
        .load("show/characters")
        .context("failed to load the raw show characters")?;
    // birth-year fallback source
    let book_characters: Vec<RawBookCharacter> = store
        .load("book/characters")
        .context("failed to load the raw book characters")?;
    let bastards: Vec<RawBastard> = store
        .load("show/bastards")
        .context("failed to load the show bastard list")?;
    let battles: Vec<RawBattle> = store
        .load("show/battles")
        .context("failed to load the show battles")?;

    let out = format_show(&characters, &book_characters, &bastards, &battles, &config);

    let vocabularies = [
        ("allegiances", &out.vocabularies.allegiances),
        ("appearances", &out.vocabularies.appearances),
        ("cultures", &out.vocabularies.cultures),
        ("titles", &out.vocabularies.titles),
    ];
    for (name, vocabulary) in vocabularies {
        store
            .write(&format!("vocab/show/{name}"), vocabulary)
            .with_context(|| format!("failed to write the {name} vocabulary"))?;
    }
    store
        .write("ml-data/show/chars-to-train", &out.train)
        .context("failed to write the training characters")?;
    store
        .write("ml-data/show/chars-to-predict", &out.predict)
        .context("failed to write the prediction characters")?;

    let num_dead = out.train.len();
    let num_alive = out.predict.len();
    println!(
        "characters    : {} ({num_alive} alive, {num_dead} dead)",
        num_dead + num_alive
    );
    let births = out.train.iter().chain(&out.predict).map(|c| c.birth);
    if let (Some(min), Some(max)) = (births.clone().min(), births.max()) {
        println!("birth         : {min} to {max}");
    }
    let deaths = out.train.iter().filter_map(|c| c.death);
    if let (Some(min), Some(max)) = (deaths.clone().min(), deaths.max()) {
        println!("death         : {min} to {max}");
    }
    let ages: Vec<i64> = out.train.iter().map(|c| c.age).collect();
    if let Some(max_age) = ages.iter().max() {
        #[expect(clippy::cast_precision_loss)]
        let average = ages.iter().sum::<i64>() as f64 / ages.len() as f64;
        println!("age           : maximum {max_age}, average {average:.1}");
    }
    for (name, vocabulary) in vocabularies {
        println!("{name:<14}: {}", vocabulary.len());
    }
    Ok(())
}
