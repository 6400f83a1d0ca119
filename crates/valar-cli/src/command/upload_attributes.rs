use anyhow::Context as _;
use valar_model::Dataset;

use super::{ApiArg, StoreArg};
use crate::schema::PredictorOutput;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct UploadAttributesArg {
    #[clap(flatten)]
    store: StoreArg,
    #[clap(flatten)]
    api: ApiArg,
}

pub(crate) fn run(arg: &UploadAttributesArg) -> anyhow::Result<()> {
    let store = arg.store.store();
    let client = arg.api.connect()?;

    for dataset in [Dataset::Book, Dataset::Show] {
        let output: PredictorOutput = store
            .load(&format!("predictions/{dataset}"))
            .with_context(|| format!("failed to load the {dataset} predictor output"))?;
        let coefficients = output.coefficients();
        client
            .update_bayesean_attributes(dataset, &coefficients)
            .with_context(|| format!("failed to upload the {dataset} coefficients"))?;
        println!(
            "updated {} {dataset} attribute coefficients",
            coefficients.len()
        );
    }
    Ok(())
}
