use std::{env, io, path::PathBuf};

use clap::{Parser, Subcommand};
use silc_analysis::config::PipelineConfig;
use tracing_subscriber::EnvFilter;

use crate::util;

use self::{
    generate_sample::GenerateSampleArg, lorenz::LorenzArg, print_config::PrintConfigArg,
    run::RunArg, summarize::SummarizeArg,
};

mod generate_sample;
mod lorenz;
mod print_config;
mod run;
mod summarize;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log debug messages
    #[arg(short, long, global = true)]
    verbose: bool,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run the regional aggregation pipeline and export its tables (default)
    Run(#[clap(flatten)] RunArg),
    /// Print inequality metrics of a household income field
    Summarize(#[clap(flatten)] SummarizeArg),
    /// Export or plot the Lorenz curve of a household income field
    Lorenz(#[clap(flatten)] LorenzArg),
    /// Generate synthetic survey files
    GenerateSample(#[clap(flatten)] GenerateSampleArg),
    /// Print the default configuration as JSON
    PrintConfig(#[clap(flatten)] PrintConfigArg),
}

/// Location of the survey files and of an optional configuration override.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SurveyInputArg {
    /// Configuration file (JSON); built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory containing the survey files
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,
}

impl Default for SurveyInputArg {
    fn default() -> Self {
        Self {
            config: None,
            data_dir: PathBuf::from("."),
        }
    }
}

impl SurveyInputArg {
    fn load_config(&self) -> anyhow::Result<PipelineConfig> {
        util::load_config(self.config.as_deref())
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);
    match args.mode.unwrap_or(Mode::Run(RunArg::default())) {
        Mode::Run(arg) => run::run(&arg)?,
        Mode::Summarize(arg) => summarize::run(&arg)?,
        Mode::Lorenz(arg) => lorenz::run(&arg)?,
        Mode::GenerateSample(arg) => generate_sample::run(&arg)?,
        Mode::PrintConfig(arg) => print_config::run(&arg)?,
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let rust_log = env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, rust_log.as_deref()))
        .with_writer(io::stderr)
        .init();
}

/// `RUST_LOG` wins when set and valid; otherwise `silc=info` (or `silc=debug`).
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let default = if verbose { "silc=debug" } else { "silc=info" };
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default))
}
