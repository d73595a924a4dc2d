use std::path::PathBuf;

use anyhow::Context;
use silc_analysis::{
    pipeline,
    record::IncomeField,
    summary::{InequalitySummary, SummaryOptions},
};
use silc_metrics::atkinson::DEFAULT_EPSILON;

use super::SurveyInputArg;
use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SummarizeArg {
    #[clap(flatten)]
    input: SurveyInputArg,
    /// Survey year label, e.g. `23`; every configured year when omitted
    #[arg(long)]
    year: Option<String>,
    /// Household income field
    #[arg(long, default_value_t = IncomeField::ScaledIncome)]
    field: IncomeField,
    /// Inequality aversion of the Atkinson index
    #[arg(long, default_value_t = DEFAULT_EPSILON)]
    epsilon: f64,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SummarizeArg) -> anyhow::Result<()> {
    let SummarizeArg {
        input,
        year,
        field,
        epsilon,
        output,
    } = arg;

    let mut config = input.load_config()?;
    if let Some(label) = year {
        config = util::select_year(&config, label)?;
    }
    let surveys = pipeline::load_surveys(&config, &input.data_dir).with_context(|| {
        format!(
            "Failed to load survey files in {}",
            input.data_dir.display()
        )
    })?;

    let options = SummaryOptions {
        atkinson_epsilon: *epsilon,
        ..SummaryOptions::default()
    };
    let mut output = Output::from_output_path(output.clone())?;
    for (i, survey) in surveys.iter().enumerate() {
        let distribution = survey
            .household_distribution(*field)
            .with_context(|| format!("Invalid {field} values in survey year {}", survey.year))?;
        if i > 0 {
            output.write_text("")?;
        }
        output.write_text(&InequalitySummary::compute(&distribution, options).to_string())?;
    }
    output.finish()
}
