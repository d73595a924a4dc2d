use std::path::PathBuf;

use silc_analysis::config::PipelineConfig;

use crate::util::Output;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PrintConfigArg {
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &PrintConfigArg) -> anyhow::Result<()> {
    Output::save_json(&PipelineConfig::default(), arg.output.clone())
}
