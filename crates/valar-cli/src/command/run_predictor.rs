use std::{path::PathBuf, process::Command};

use anyhow::{Context as _, ensure};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RunPredictorArg {
    /// Working directory the predictor runs in
    #[arg(long, default_value = "predictor")]
    workdir: PathBuf,
    /// Command line to execute
    #[arg(long, default_value = "python3 predictor.py")]
    command: String,
}

pub(crate) fn run(arg: &RunPredictorArg) -> anyhow::Result<()> {
    let mut parts = arg.command.split_whitespace();
    let program = parts.next().context("predictor command is empty")?;

    let status = Command::new(program)
        .args(parts)
        .current_dir(&arg.workdir)
        .status()
        .with_context(|| {
            format!(
                "failed to launch `{}` in {}",
                arg.command,
                arg.workdir.display()
            )
        })?;
    ensure!(status.success(), "predictor exited with {status}");
    println!("prediction complete");
    Ok(())
}
