use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use rand::{Rng, SeedableRng as _};
use rand_distr::LogNormal;
use rand_pcg::Pcg32;
use silc_analysis::config::{ColumnNames, PipelineConfig, SurveyYearConfig};
use tracing::info;

use crate::util;

/// NUTS-1 region codes written to the household file.
const REGIONS: [&str; 12] = [
    "TR1", "TR2", "TR3", "TR4", "TR5", "TR6", "TR7", "TR8", "TR9", "TRA", "TRB", "TRC",
];
const EDUCATION_LEVELS: u32 = 10;
const EMPLOYMENT_RATE: f64 = 0.6;
const LOSS_RATE: f64 = 0.02;
const TRANSFER_RATE: f64 = 0.4;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenerateSampleArg {
    /// Configuration whose years, delimiters and column codes are used
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of households per survey year
    #[arg(long, default_value_t = 500)]
    households: u64,
    /// Seed of the random generator
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Directory the survey files are written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

pub(crate) fn run(arg: &GenerateSampleArg) -> anyhow::Result<()> {
    let GenerateSampleArg {
        config,
        households,
        seed,
        output_dir,
    } = arg;

    let config = util::load_config(config.as_deref())?;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory {}", output_dir.display()))?;

    let mut rng = Pcg32::seed_from_u64(*seed);
    let income = LogNormal::new(10.0, 0.8).context("Invalid income distribution")?;
    let transfer = LogNormal::new(8.0, 0.7).context("Invalid transfer distribution")?;

    for year in &config.years {
        let files = SampleFiles::generate(&config, *households, &mut rng, income, transfer);
        files.write(year, &config.columns, output_dir)?;
        info!(
            year = year.year,
            households,
            individuals = files.records.len(),
            "generated sample survey files"
        );
    }
    Ok(())
}

#[derive(Debug, Default)]
struct SampleFiles {
    households: Vec<Vec<String>>,
    records: Vec<Vec<String>>,
    personal: Vec<Vec<String>>,
}

impl SampleFiles {
    fn generate<R>(
        config: &PipelineConfig,
        households: u64,
        rng: &mut R,
        income: LogNormal<f64>,
        transfer: LogNormal<f64>,
    ) -> Self
    where
        R: Rng,
    {
        let mut files = Self::default();
        let transfer_columns = config.columns.transfers.len();
        let oldest = config.adult_age_threshold.saturating_add(1).max(85);
        for family in 1..=households {
            let region = REGIONS[rng.random_range(0..REGIONS.len())];
            let weight = rng.random_range(500.0..3_000.0_f64);
            let adults = rng.random_range(1..=4_u64);
            let children = rng.random_range(0..=3_u64);

            let mut household_income = 0.0;
            for individual in 1..=adults + children {
                let is_adult = individual <= adults;
                let age = if is_adult {
                    rng.random_range(config.adult_age_threshold + 1..=oldest)
                } else {
                    rng.random_range(0..=config.adult_age_threshold)
                };
                let gender = if rng.random_bool(0.5) {
                    config.gender_codes.male
                } else {
                    config.gender_codes.female
                };
                files.records.push(vec![
                    family.to_string(),
                    individual.to_string(),
                    format!("{weight:.2}"),
                    age.to_string(),
                    gender.to_string(),
                ]);

                if age > config.working_age_threshold {
                    let personal_income = if rng.random_bool(LOSS_RATE) {
                        Some(-rng.sample(income) / 10.0)
                    } else if rng.random_bool(EMPLOYMENT_RATE) {
                        Some(rng.sample(income))
                    } else {
                        None
                    };
                    household_income += personal_income.unwrap_or(0.0);
                    files.personal.push(vec![
                        family.to_string(),
                        individual.to_string(),
                        rng.random_range(0..=EDUCATION_LEVELS).to_string(),
                        rng.random_range(1..=2_u32).to_string(),
                        personal_income.map(|v| format!("{v:.0}")).unwrap_or_default(),
                    ]);
                }
            }

            // Transfers land in one randomly chosen component column
            let mut transfers = vec![String::new(); transfer_columns];
            if transfer_columns > 0 && rng.random_bool(TRANSFER_RATE) {
                let amount = rng.sample(transfer);
                household_income += amount;
                transfers[rng.random_range(0..transfer_columns)] = format!("{amount:.0}");
            }

            let mut row = vec![
                family.to_string(),
                region.to_owned(),
                format!("{weight:.2}"),
                format!("{household_income:.0}"),
            ];
            row.extend(transfers);
            files.households.push(row);
        }
        files
    }

    fn write(
        &self,
        year: &SurveyYearConfig,
        columns: &ColumnNames,
        output_dir: &Path,
    ) -> anyhow::Result<()> {
        let mut household_header: Vec<&str> = vec![
            columns.family.as_str(),
            &columns.region,
            &columns.household_weight,
            &columns.household_income,
        ];
        household_header.extend(columns.transfers.iter().map(String::as_str));
        let record_header: [&str; 5] = [
            columns.family.as_str(),
            &columns.individual,
            &columns.record_weight,
            &columns.age,
            &columns.gender,
        ];
        let personal_header: [&str; 5] = [
            columns.family.as_str(),
            &columns.individual,
            &columns.education,
            &columns.place_of_work,
            &columns.personal_income,
        ];

        let delimiter = year.delimiter_byte();
        write_table(
            &output_dir.join(&year.household_file),
            delimiter,
            &household_header,
            &self.households,
        )?;
        write_table(
            &output_dir.join(&year.personal_record_file),
            delimiter,
            &record_header,
            &self.records,
        )?;
        write_table(
            &output_dir.join(&year.personal_file),
            delimiter,
            &personal_header,
            &self.personal,
        )
    }
}

fn write_table(
    path: &Path,
    delimiter: u8,
    header: &[&str],
    rows: &[Vec<String>],
) -> anyhow::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    writer
        .write_record(header)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    for row in rows {
        writer
            .write_record(row)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}
