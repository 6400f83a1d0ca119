use anyhow::Context as _;
use valar_features::{AttrRange, JoinedOneHotEncoder, encoder::identity_sweep};
use valar_io::tensor::write_tensor_file;
use valar_model::{Corpus, Dataset, Entity};

use super::StoreArg;

/// The ordinal model uses a reduced layout: the swept `age` region plus a
/// handful of stable attributes.
const SCALAR_ATTRS: &[&str] = &["male", "pageRank"];
const VECTOR_ATTRS: &[&str] = &["age", "books", "house", "locations", "titles"];

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EncodeUnfoldedArg {
    #[clap(flatten)]
    store: StoreArg,
    /// Which dataset's formatted characters to encode
    #[arg(long, default_value_t = Dataset::Book)]
    dataset: Dataset,
    /// Compress the tensor files
    #[arg(long)]
    compress: bool,
}

pub(crate) fn run(arg: &EncodeUnfoldedArg) -> anyhow::Result<()> {
    let store = arg.store.store();
    let dataset = arg.dataset;

    let train = store
        .load_corpus(&format!("ml-data/{dataset}/chars-to-train"))
        .context("failed to load the training characters")?;
    let predict = store
        .load_corpus(&format!("ml-data/{dataset}/chars-to-predict"))
        .context("failed to load the prediction characters")?;

    let reference: Corpus = train.iter().chain(&predict).cloned().collect();
    let encoder = JoinedOneHotEncoder::new(&reference, SCALAR_ATTRS, VECTOR_ATTRS);

    // Each training character becomes one example per age step; the label
    // says how much longer the character stayed alive. Prediction inputs
    // are not unfolded.
    let (data_train, labels_train) =
        encoder.encode_many_unfolded(&train, "age", survival_steps_label, None, identity_sweep);
    let data_predict = encoder.encode_many(&predict);

    println!("number of training datapoints      : {}", data_train.len());
    println!("number of dimensions per datapoint : {}", encoder.len());

    let out_dir = store.root().join("ml-data").join(dataset.to_string());
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let tensors = [
        ("v3-data-train", &data_train),
        ("v3-data-predict", &data_predict),
        ("v3-labels-train", &labels_train),
    ];
    for (name, rows) in tensors {
        let path = write_tensor_file(out_dir.join(name), rows, arg.compress)
            .with_context(|| format!("failed to write the {name} tensor"))?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

/// Label for one unfolded example: a span-length vector whose first
/// `age - curr_age` entries are 1.0 ("still alive this many steps after
/// the swept age").
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn survival_steps_label(entity: &Entity, curr_age: f64, age_range: AttrRange) -> Vec<f32> {
    let span = age_range.span() as usize;
    let mut label = vec![0.0_f32; span];
    let alive_steps = (entity.scalar("age") - curr_age).max(0.0) as usize;
    for slot in label.iter_mut().take(alive_steps) {
        *slot = 1.0;
    }
    label
}

#[cfg(test)]
mod tests {
    use valar_model::AttrValue;

    use super::*;

    fn character(age: f64) -> Entity {
        let mut e = Entity::new();
        e.insert("age", AttrValue::Number(age));
        e
    }

    #[test]
    fn label_marks_the_remaining_lifetime() {
        let label = survival_steps_label(&character(3.0), 1.0, AttrRange::new(0.0, 4.0));
        assert_eq!(label, vec![1.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn label_is_all_zero_at_and_beyond_the_death_age() {
        let range = AttrRange::new(0.0, 4.0);
        assert_eq!(
            survival_steps_label(&character(2.0), 2.0, range),
            vec![0.0; 5]
        );
        assert_eq!(
            survival_steps_label(&character(2.0), 4.0, range),
            vec![0.0; 5]
        );
    }

    #[test]
    fn label_length_follows_the_range_span() {
        let label = survival_steps_label(&character(10.0), 0.0, AttrRange::new(0.0, 9.0));
        assert_eq!(label.len(), 10);
        assert!(label.iter().all(|v| *v == 1.0));
    }
}
