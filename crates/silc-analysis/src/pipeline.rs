//! End-to-end aggregation run
//!
//! [`run`] loads and joins every configured survey year, then builds the
//! regional income statistics and the regional Gini table. Every failure
//! aborts the run. [`PipelineOutput::write`] exports the tables and a
//! `run_summary.json` manifest into an output directory.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use tracing::{debug, info};

use crate::{
    config::{ConfigError, PipelineConfig},
    export::{self, ExportError, RunManifest, YearManifest},
    gini_table::{GiniTableError, RegionGiniTable},
    load::RawSurveyYear,
    region::RegionIncomeStatistics,
    survey::SurveyYear,
    table::LoadError,
};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum AnalysisError {
    #[display("{_0}")]
    Config(ConfigError),
    #[display("{_0}")]
    Load(LoadError),
    #[display("{_0}")]
    GiniTable(GiniTableError),
    #[display("{_0}")]
    Export(ExportError),
    #[display("failed to create output directory {}: {source}", path.display())]
    #[from(ignore)]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Loads and joins the configured years from `data_dir`, in configuration order.
pub fn load_surveys(
    config: &PipelineConfig,
    data_dir: &Path,
) -> Result<Vec<SurveyYear>, AnalysisError> {
    config.validate()?;
    config
        .years
        .iter()
        .map(|year| {
            info!(year = year.year, "loading survey year");
            let raw = RawSurveyYear::load(config, year, data_dir)?;
            Ok(SurveyYear::build(&raw, year, config))
        })
        .collect()
}

/// Results of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub surveys: Vec<SurveyYear>,
    pub regions: BTreeSet<String>,
    pub region_statistics: Vec<RegionIncomeStatistics>,
    pub gini_table: RegionGiniTable,
}

pub fn run(config: &PipelineConfig, data_dir: &Path) -> Result<PipelineOutput, AnalysisError> {
    let surveys = load_surveys(config, data_dir)?;

    let regions = surveys
        .iter()
        .flat_map(SurveyYear::regions)
        .map(str::to_owned)
        .collect::<BTreeSet<_>>();
    info!(regions = regions.len(), "computing regional statistics");

    let region_statistics = surveys
        .iter()
        .map(|survey| RegionIncomeStatistics::compute(survey, &regions))
        .collect();
    let gini_table = RegionGiniTable::compute(&surveys, &regions, config.working_age_threshold)?;
    debug!(rows = gini_table.rows.len(), "computed Gini table");

    Ok(PipelineOutput {
        surveys,
        regions,
        region_statistics,
        gini_table,
    })
}

impl PipelineOutput {
    /// Writes every table and the manifest into `output_dir`, returning the manifest.
    pub fn write(&self, output_dir: &Path) -> Result<RunManifest, AnalysisError> {
        fs::create_dir_all(output_dir).map_err(|source| AnalysisError::OutputDir {
            path: output_dir.to_owned(),
            source,
        })?;

        let mut outputs = vec![PathBuf::from(export::GINI_TABLE_FILE)];
        export::save_gini_table(&self.gini_table, &output_dir.join(export::GINI_TABLE_FILE))?;
        for statistics in &self.region_statistics {
            let file = export::region_statistics_file(&statistics.label);
            export::save_region_statistics(statistics, &output_dir.join(&file))?;
            outputs.push(PathBuf::from(file));
        }

        let manifest = RunManifest {
            generated_at: Utc::now(),
            years: self
                .surveys
                .iter()
                .map(|survey| YearManifest {
                    label: survey.label.clone(),
                    year: survey.year,
                    households: survey.households.len(),
                    individuals: survey.individuals.len(),
                })
                .collect(),
            regions: self.regions.len(),
            outputs,
        };
        manifest.save(&output_dir.join(export::MANIFEST_FILE))?;
        info!(output_dir = %output_dir.display(), "wrote outputs");
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{gini_table::GiniGroup, record::IncomeField};

    const HOUSEHOLD_HEADER: &str =
        "BULTEN,HB031,HB040,HG110,HG030N,HG030A,HG040,HG050N,HG050A,HG060N,HG060A";
    const RECORD_HEADER: &str = "BULTEN,FERT_ID,FK050,FK070,FK090";
    const PERSONAL_HEADER: &str = "BULTEN,FERT_ID,FE030,FI145,FG140";

    fn write_year(
        dir: &Path,
        label: &str,
        delimiter: char,
        households: &[&str],
        records: &[&str],
        personal: &[&str],
    ) {
        let write = |name: String, header: &str, rows: &[&str]| {
            let mut text = header.replace(',', &delimiter.to_string());
            text.push('\n');
            for row in rows {
                text.push_str(&row.replace(',', &delimiter.to_string()));
                text.push('\n');
            }
            fs::write(dir.join(name), text).unwrap();
        };
        write(format!("gyk{label}_h.csv"), HOUSEHOLD_HEADER, households);
        write(format!("gyk{label}_fk.csv"), RECORD_HEADER, records);
        write(format!("gyk{label}_f.csv"), PERSONAL_HEADER, personal);
    }

    fn fixture(dir: &Path) {
        // 2022: TR1 has the outlier families 9292 and 9289
        write_year(
            dir,
            "22",
            ';',
            &[
                "1,TR1,1,20000,1000,,,,,,",
                "2,TR1,1,40000,,,,,,,",
                "9292,TR1,1,5000000,,,,,,,",
                "9289,TR2,1,-900000,,,,,,,",
                "3,TR2,1,30000,,,,,,,",
            ],
            &[
                "1,1,1,40,2",
                "2,1,1,50,1",
                "2,2,1,45,2",
                "9292,1,1,30,1",
                "9289,1,1,30,2",
                "3,1,1,33,1",
            ],
            &[
                "1,1,5,1,-500",
                "2,1,7,1,30000",
                "2,2,7,1,10000",
                "9292,1,7,1,4000000",
                "9289,1,7,1,-4000000",
                "3,1,9,1,12000",
            ],
        );
        // 2023: TR1 holds the five-household example, TR3 appears only here
        write_year(
            dir,
            "23",
            ',',
            &[
                "11,TR1,1,10000,,,,,,,",
                "12,TR1,1,20000,,,,,,,",
                "13,TR1,1,30000,,,,,,,",
                "14,TR1,1,40000,,,,,,,",
                "15,TR1,1,100000,,,,,,,",
                "16,TR3,1,25000,500,500,,,,,",
            ],
            &[
                "11,1,1,30,1",
                "12,1,1,30,2",
                "13,1,1,30,1",
                "14,1,1,30,2",
                "15,1,1,30,1",
                "16,1,1,30,2",
                "16,2,1,5,1",
            ],
            &[
                "11,1,5,1,10000",
                "12,1,5,1,20000",
                "13,1,5,1,30000",
                "14,1,5,1,40000",
                "15,1,5,1,100000",
                "16,1,5,1,25000",
            ],
        );
    }

    #[test]
    fn test_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        let config = PipelineConfig::default();
        let output = run(&config, dir.path()).unwrap();

        // Outliers are gone from both sets
        let y22 = &output.surveys[0];
        assert_eq!(y22.households.len(), 3);
        assert!(y22.individuals.iter().all(|i| ![9292, 9289].contains(&i.family)));
        assert_eq!(
            output.regions.iter().map(String::as_str).collect::<Vec<_>>(),
            ["TR1", "TR2", "TR3"]
        );

        // Region means skip the outlier incomes
        let stats22 = &output.region_statistics[0];
        assert_eq!(stats22.rows[0].mean(IncomeField::Income), Some(30_000.0));

        // The five-household region
        let stats23 = &output.region_statistics[1];
        assert_eq!(stats23.rows[0].mean(IncomeField::Income), Some(40_000.0));
        let overall = output
            .gini_table
            .value("TR1", 2023, GiniGroup::Overall)
            .unwrap();
        assert!((overall - 0.4).abs() < 1e-12);

        // 2022 TR1 women: the negative income of family 1 is floored to zero
        let women = output
            .gini_table
            .value("TR1", 2022, GiniGroup::Women)
            .unwrap();
        assert!((women - 0.5).abs() < 1e-12);
        // Empty groups leave empty cells
        assert_eq!(output.gini_table.value("TR2", 2022, GiniGroup::Women), None);
        assert_eq!(output.gini_table.value("TR3", 2023, GiniGroup::Men), None);
        assert_eq!(output.gini_table.value("TR3", 2022, GiniGroup::Overall), None);

        // Sorted by the 2023 overall column; TR2 has no 2023 households
        let order = output
            .gini_table
            .rows
            .iter()
            .map(|row| row.region.as_str())
            .collect::<Vec<_>>();
        assert_eq!(order, ["TR3", "TR1", "TR2"]);
    }

    #[test]
    fn test_write_outputs() {
        let data = tempfile::tempdir().unwrap();
        fixture(data.path());
        let output = run(&PipelineConfig::default(), data.path()).unwrap();

        let out = tempfile::tempdir().unwrap();
        let out_dir = out.path().join("results");
        let manifest = output.write(&out_dir).unwrap();
        assert_eq!(manifest.regions, 3);
        assert_eq!(manifest.years[0].households, 3);
        assert_eq!(manifest.outputs.len(), 3);

        let gini = fs::read_to_string(out_dir.join(export::GINI_TABLE_FILE)).unwrap();
        let header = gini.lines().next().unwrap();
        assert!(header.starts_with("Region,GINI Coefficient for Women - 2022,"));
        assert!(header.ends_with(",GINI Coefficient - 2023"));
        assert_eq!(gini.lines().count(), 4);

        let stats = fs::read_to_string(out_dir.join("RegionIncomeStatistics23.csv")).unwrap();
        assert!(stats.lines().nth(3).unwrap().starts_with("TR3,"));
        assert!(out_dir.join(export::MANIFEST_FILE).exists());
    }

    #[test]
    fn test_missing_column_aborts_the_run() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        fs::write(
            dir.path().join("gyk23_f.csv"),
            "BULTEN,FERT_ID,FE030,FI145\n1,1,5,1\n",
        )
        .unwrap();
        let err = run(&PipelineConfig::default(), dir.path()).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Load(LoadError::MissingColumn { ref column, .. }) if column == "FG140"
        ));
    }
}
