use std::path::PathBuf;

use anyhow::Context;
use silc_analysis::pipeline;
use tracing::info;

use super::SurveyInputArg;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RunArg {
    #[clap(flatten)]
    input: SurveyInputArg,
    /// Directory the tables and the run manifest are written to
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,
}

impl Default for RunArg {
    fn default() -> Self {
        Self {
            input: SurveyInputArg::default(),
            output_dir: PathBuf::from("output"),
        }
    }
}

pub(crate) fn run(arg: &RunArg) -> anyhow::Result<()> {
    let RunArg { input, output_dir } = arg;

    let config = input.load_config()?;
    let output = pipeline::run(&config, &input.data_dir).with_context(|| {
        format!(
            "Failed to aggregate survey files in {}",
            input.data_dir.display()
        )
    })?;
    let manifest = output
        .write(output_dir)
        .with_context(|| format!("Failed to write outputs to {}", output_dir.display()))?;

    for survey in &manifest.years {
        info!(
            year = survey.year,
            households = survey.households,
            individuals = survey.individuals,
            "aggregated survey year"
        );
    }
    for file in &manifest.outputs {
        println!("{}", output_dir.join(file).display());
    }
    Ok(())
}
