use std::path::PathBuf;

use clap::{Parser, Subcommand};
use valar_io::DataStore;
use valar_model::PipelineConfig;

use self::{
    encode::EncodeArg, encode_unfolded::EncodeUnfoldedArg, format_book::FormatBookArg,
    format_show::FormatShowArg, run_predictor::RunPredictorArg,
    upload_attributes::UploadAttributesArg, upload_predictions::UploadPredictionsArg,
};

mod encode;
mod encode_unfolded;
mod format_book;
mod format_show;
mod run_predictor;
mod upload_attributes;
mod upload_predictions;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Which pipeline stage to run
    #[command(subcommand)]
    stage: Stage,
}

#[derive(Debug, Clone, Subcommand)]
enum Stage {
    /// Format the raw book dataset into model-ready characters
    FormatBook(#[clap(flatten)] FormatBookArg),
    /// Format the raw show dataset into model-ready characters
    FormatShow(#[clap(flatten)] FormatShowArg),
    /// Encode formatted characters as joined one-hot tensors
    Encode(#[clap(flatten)] EncodeArg),
    /// Encode with age unfolding for the ordinal survival model
    EncodeUnfolded(#[clap(flatten)] EncodeUnfoldedArg),
    /// Run the external predictor process
    RunPredictor(#[clap(flatten)] RunPredictorArg),
    /// Upload per-attribute model coefficients to the API
    UploadAttributes(#[clap(flatten)] UploadAttributesArg),
    /// Upload per-character survival predictions to the API
    UploadPredictions(#[clap(flatten)] UploadPredictionsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.stage {
        Stage::FormatBook(arg) => format_book::run(&arg)?,
        Stage::FormatShow(arg) => format_show::run(&arg)?,
        Stage::Encode(arg) => encode::run(&arg)?,
        Stage::EncodeUnfolded(arg) => encode_unfolded::run(&arg)?,
        Stage::RunPredictor(arg) => run_predictor::run(&arg)?,
        Stage::UploadAttributes(arg) => upload_attributes::run(&arg)?,
        Stage::UploadPredictions(arg) => upload_predictions::run(&arg)?,
    }
    Ok(())
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct StoreArg {
    /// Root directory of the JSON data store
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
}

impl StoreArg {
    pub(crate) fn store(&self) -> DataStore {
        DataStore::new(&self.data_dir)
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ConfigArg {
    /// Current in-universe year of the book timeline
    #[arg(long, default_value_t = PipelineConfig::default().current_year_book)]
    current_year_book: i64,
    /// Current in-universe year of the show timeline
    #[arg(long, default_value_t = PipelineConfig::default().current_year_show)]
    current_year_show: i64,
    /// First year of the show timeline
    #[arg(long, default_value_t = PipelineConfig::default().show_begin)]
    show_begin: i64,
    /// Maximum plausible age; older characters are dropped as data errors
    #[arg(long, default_value_t = PipelineConfig::default().age_maximum)]
    age_maximum: i64,
}

impl ConfigArg {
    pub(crate) fn config(&self) -> PipelineConfig {
        PipelineConfig {
            current_year_book: self.current_year_book,
            current_year_show: self.current_year_show,
            show_begin: self.show_begin,
            age_maximum: self.age_maximum,
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ApiArg {
    /// Base URL of the prediction API
    #[arg(long, default_value = "https://got.show/api")]
    api_url: String,
    /// Shared-secret token authorizing write operations
    #[arg(long)]
    token: String,
}

impl ApiArg {
    pub(crate) fn connect(&self) -> anyhow::Result<valar_api::ApiClient> {
        use anyhow::Context as _;
        valar_api::ApiClient::connect(&self.api_url, &self.token)
            .with_context(|| format!("failed to connect to the prediction API at {}", self.api_url))
    }
}
