use std::path::PathBuf;

use anyhow::Context;
use silc_analysis::{export, pipeline, record::IncomeField};

use self::app::App;
use super::SurveyInputArg;
use crate::util::{self, Output};

mod app;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct LorenzArg {
    #[clap(flatten)]
    input: SurveyInputArg,
    /// Survey year label, e.g. `23`
    #[arg(long)]
    year: String,
    /// Household income field
    #[arg(long, default_value_t = IncomeField::ScaledIncome)]
    field: IncomeField,
    /// Output CSV path; stdout unless `--plot` is given
    #[arg(long)]
    output: Option<PathBuf>,
    /// Show the curve in a terminal chart
    #[arg(long)]
    plot: bool,
}

pub(crate) fn run(arg: &LorenzArg) -> anyhow::Result<()> {
    let LorenzArg {
        input,
        year,
        field,
        output,
        plot,
    } = arg;

    let config = util::select_year(&input.load_config()?, year)?;
    let surveys = pipeline::load_surveys(&config, &input.data_dir).with_context(|| {
        format!(
            "Failed to load survey files in {}",
            input.data_dir.display()
        )
    })?;
    let survey = surveys
        .first()
        .with_context(|| format!("Survey year '{year}' produced no data"))?;
    let distribution = survey
        .household_distribution(*field)
        .with_context(|| format!("Invalid {field} values in survey year {}", survey.year))?;
    let curve = distribution
        .lorenz_curve()
        .with_context(|| format!("Failed to compute Lorenz curve of {field} ({})", survey.year))?;

    if output.is_some() || !plot {
        let mut output = Output::from_output_path(output.clone())?;
        export::write_lorenz_curve(&curve, &mut output)
            .with_context(|| format!("Failed to write Lorenz curve to {}", output.display_path()))?;
        output.finish()?;
    }

    if *plot {
        let title = distribution.label().unwrap_or(field.column_name()).to_owned();
        let mut terminal = ratatui::init();
        let app_result = App::new(title, &curve).run(&mut terminal);
        ratatui::restore();
        app_result?;
    }
    Ok(())
}
