use anyhow::Context as _;
use valar_formatter::raw::RawBookCharacter;
use valar_model::Dataset;

use super::{ApiArg, ConfigArg, StoreArg};
use crate::schema::{CharacterPrediction, PredictorOutput};

/// Years of survival probabilities uploaded per character.
const LONGEVITY_WINDOW: usize = 21;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct UploadPredictionsArg {
    #[clap(flatten)]
    store: StoreArg,
    #[clap(flatten)]
    api: ApiArg,
    #[clap(flatten)]
    config: ConfigArg,
}

pub(crate) fn run(arg: &UploadPredictionsArg) -> anyhow::Result<()> {
    let store = arg.store.store();
    let config = arg.config.config();
    let client = arg.api.connect()?;

    // Book survival functions start at the character's birth year, so the
    // raw characters are needed to anchor them on the timeline.
    let characters: Vec<RawBookCharacter> = store
        .load("book/characters")
        .context("failed to load the raw book characters")?;
    let book: PredictorOutput = store
        .load("predictions/book")
        .context("failed to load the book predictor output")?;

    let book_start = u32::try_from(config.current_year_book)
        .context("the book current year must be non-negative")?;
    let mut updated = 0_usize;
    for (name, prediction) in &book.characters {
        let Some(birth) = characters
            .iter()
            .find(|c| c.name == *name)
            .and_then(|c| c.birth)
        else {
            eprintln!("skipping {name}: no birth year in the book dataset");
            continue;
        };
        let Ok(offset) = usize::try_from(config.current_year_book - birth) else {
            eprintln!("skipping {name}: born after the current year");
            continue;
        };
        let (window, plod) = windowed_prediction(prediction, offset);
        match client.update_plod_longevity(Dataset::Book, name, window, book_start, plod) {
            Ok(()) => updated += 1,
            Err(err) => eprintln!("skipping {name}: {err}"),
        }
    }
    println!("successfully updated {updated} book predictions");

    // Show survival functions all start at the show's first year.
    let show: PredictorOutput = store
        .load("predictions/show")
        .context("failed to load the show predictor output")?;
    let show_start = u32::try_from(config.current_year_show)
        .context("the show current year must be non-negative")?;
    let offset = usize::try_from(config.current_year_show - config.show_begin)
        .context("the show timeline must begin before the current year")?;

    let mut updated = 0_usize;
    for (name, prediction) in &show.characters {
        let (window, plod) = windowed_prediction(prediction, offset);
        match client.update_plod_longevity(Dataset::Show, name, window, show_start, plod) {
            Ok(()) => updated += 1,
            Err(err) => eprintln!("skipping {name}: {err}"),
        }
    }
    println!("successfully updated {updated} show predictions");
    Ok(())
}

/// Slices the survival window starting at `offset` and derives the PLOD
/// for the coming year. A survival function too short to cover next year
/// means the character is certain to die: PLOD 1.
fn windowed_prediction(prediction: &CharacterPrediction, offset: usize) -> (&[f64], f64) {
    let sf = &prediction.survival_function_mean;
    let plod = sf.get(offset + 1).map_or(1.0, |survival| 1.0 - survival);
    let window = if offset < sf.len() {
        &sf[offset..(offset + LONGEVITY_WINDOW).min(sf.len())]
    } else {
        &[]
    };
    (window, plod)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(sf: &[f64]) -> CharacterPrediction {
        CharacterPrediction {
            survival_function_mean: sf.to_vec(),
        }
    }

    #[test]
    fn plod_is_the_complement_of_next_years_survival() {
        let p = prediction(&[1.0, 0.9, 0.7]);
        let (window, plod) = windowed_prediction(&p, 1);
        assert!((plod - 0.3).abs() < 1e-12);
        assert_eq!(window, &[0.9, 0.7]);
    }

    #[test]
    fn short_survival_functions_mean_certain_death() {
        let p = prediction(&[1.0, 0.9]);
        let (window, plod) = windowed_prediction(&p, 1);
        assert_eq!(plod, 1.0);
        assert_eq!(window, &[0.9]);

        let (window, plod) = windowed_prediction(&p, 5);
        assert_eq!(plod, 1.0);
        assert!(window.is_empty());
    }

    #[test]
    fn window_is_capped_at_twenty_one_years() {
        let sf: Vec<f64> = (0..40).map(|i| 1.0 - f64::from(i) / 100.0).collect();
        let p = prediction(&sf);
        let (window, _) = windowed_prediction(&p, 0);
        assert_eq!(window.len(), LONGEVITY_WINDOW);
    }
}
