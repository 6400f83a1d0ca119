use anyhow::Context as _;
use valar_features::JoinedOneHotEncoder;
use valar_io::tensor::write_tensor_file;
use valar_model::{Corpus, Dataset};

use super::StoreArg;

/// Scalar slots of the dense survival model's input layout.
const SCALAR_ATTRS: &[&str] = &["male", "pageRank", "numRelatives"];
/// One-hot regions, in declaration order.
const VECTOR_ATTRS: &[&str] = &[
    "age",
    "allegiances",
    "books",
    "culture",
    "house",
    "houseRegion",
    "locations",
    "titles",
];

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EncodeArg {
    #[clap(flatten)]
    store: StoreArg,
    /// Which dataset's formatted characters to encode
    #[arg(long, default_value_t = Dataset::Book)]
    dataset: Dataset,
    /// Compress the tensor files
    #[arg(long)]
    compress: bool,
}

pub(crate) fn run(arg: &EncodeArg) -> anyhow::Result<()> {
    let store = arg.store.store();
    let dataset = arg.dataset;

    let train = store
        .load_corpus(&format!("ml-data/{dataset}/chars-to-train"))
        .context("failed to load the training characters")?;
    let predict = store
        .load_corpus(&format!("ml-data/{dataset}/chars-to-predict"))
        .context("failed to load the prediction characters")?;

    // The layout must be derived from the union of both splits so that
    // train and predict vectors stay slot-compatible.
    let reference: Corpus = train.iter().chain(&predict).cloned().collect();
    let encoder = JoinedOneHotEncoder::new(&reference, SCALAR_ATTRS, VECTOR_ATTRS);

    let data_train = encoder.encode_many(&train);
    let data_predict = encoder.encode_many(&predict);

    println!("number of training datapoints      : {}", data_train.len());
    println!("number of dimensions per datapoint : {}", encoder.len());

    let out_dir = store.root().join("ml-data").join(dataset.to_string());
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    for (name, rows) in [("v2-data-train", &data_train), ("v2-data-predict", &data_predict)] {
        let path = write_tensor_file(out_dir.join(name), rows, arg.compress)
            .with_context(|| format!("failed to write the {name} tensor"))?;
        println!("wrote {}", path.display());
    }
    Ok(())
}
