//! CSV and JSON outputs
//!
//! Missing values are written as empty cells. Numbers use the shortest
//! representation that round-trips.

use std::{
    fs::File,
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use silc_metrics::lorenz::LorenzCurve;

use crate::{gini_table::RegionGiniTable, region::RegionIncomeStatistics};

pub const GINI_TABLE_FILE: &str = "RegionGINI.csv";
pub const MANIFEST_FILE: &str = "run_summary.json";

/// File name of the region statistics of year `label`, e.g. `RegionIncomeStatistics22.csv`.
#[must_use]
pub fn region_statistics_file(label: &str) -> String {
    format!("RegionIncomeStatistics{label}.csv")
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ExportError {
    #[display("failed to create {}: {source}", path.display())]
    Create { path: PathBuf, source: io::Error },
    #[display("failed to write {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },
    #[display("failed to write {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn write_gini_table<W>(table: &RegionGiniTable, writer: W) -> Result<(), csv::Error>
where
    W: io::Write,
{
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(table.column_names())?;
    for row in &table.rows {
        writer.write_record(
            std::iter::once(row.region.clone()).chain(row.values.iter().map(|v| cell(*v))),
        )?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_region_statistics<W>(
    statistics: &RegionIncomeStatistics,
    writer: W,
) -> Result<(), csv::Error>
where
    W: io::Write,
{
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(RegionIncomeStatistics::column_names())?;
    for row in &statistics.rows {
        writer.write_record(
            std::iter::once(row.region.clone())
                .chain(row.means.iter().map(|v| cell(*v)))
                .chain([cell(row.transfers_pct_of_income)]),
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `population_share,income_share` pairs.
///
/// # Examples
///
/// ```
/// use silc_analysis::export::write_lorenz_curve;
/// use silc_metrics::lorenz::LorenzCurve;
///
/// let curve = LorenzCurve::new(&[1.0, 3.0]).unwrap();
/// let mut out = Vec::new();
/// write_lorenz_curve(&curve, &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "population_share,income_share\n0,0.25\n1,1\n");
/// ```
pub fn write_lorenz_curve<W>(curve: &LorenzCurve, writer: W) -> Result<(), csv::Error>
where
    W: io::Write,
{
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["population_share", "income_share"])?;
    for (x, y) in curve.points() {
        writer.write_record([x.to_string(), y.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_gini_table(table: &RegionGiniTable, path: &Path) -> Result<(), ExportError> {
    save_csv(path, |file| write_gini_table(table, file))
}

pub fn save_region_statistics(
    statistics: &RegionIncomeStatistics,
    path: &Path,
) -> Result<(), ExportError> {
    save_csv(path, |file| write_region_statistics(statistics, file))
}

pub fn save_lorenz_curve(curve: &LorenzCurve, path: &Path) -> Result<(), ExportError> {
    save_csv(path, |file| write_lorenz_curve(curve, file))
}

fn save_csv<F>(path: &Path, write: F) -> Result<(), ExportError>
where
    F: FnOnce(BufWriter<File>) -> Result<(), csv::Error>,
{
    let file = File::create(path).map_err(|source| ExportError::Create {
        path: path.to_owned(),
        source,
    })?;
    write(BufWriter::new(file)).map_err(|source| ExportError::Csv {
        path: path.to_owned(),
        source,
    })
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Record of one pipeline run, written next to the tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub generated_at: DateTime<Utc>,
    pub years: Vec<YearManifest>,
    pub regions: usize,
    pub outputs: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearManifest {
    pub label: String,
    pub year: i32,
    pub households: usize,
    pub individuals: usize,
}

impl RunManifest {
    pub fn save(&self, path: &Path) -> Result<(), ExportError> {
        let file = File::create(path).map_err(|source| ExportError::Create {
            path: path.to_owned(),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(|source| {
            ExportError::Json {
                path: path.to_owned(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{
        gini_table::{GiniGroup, RegionGiniRow},
        region::RegionIncomeRow,
    };

    #[test]
    fn test_gini_table_csv() {
        let table = RegionGiniTable {
            columns: vec![(2023, GiniGroup::Women), (2023, GiniGroup::Overall)],
            rows: vec![
                RegionGiniRow {
                    region: "TR1".to_owned(),
                    values: vec![Some(0.25), Some(0.4)],
                },
                RegionGiniRow {
                    region: "TR2".to_owned(),
                    values: vec![None, None],
                },
            ],
        };
        let mut out = Vec::new();
        write_gini_table(&table, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Region,GINI Coefficient for Women - 2023,GINI Coefficient - 2023\n\
             TR1,0.25,0.4\n\
             TR2,,\n"
        );
    }

    #[test]
    fn test_region_statistics_csv() {
        let statistics = RegionIncomeStatistics {
            label: "22".to_owned(),
            year: 2022,
            rows: vec![RegionIncomeRow {
                region: "TR1".to_owned(),
                means: [Some(1.5), None, Some(3.0), Some(2.0), Some(1.0), Some(2.0)],
                transfers_pct_of_income: Some(33.5),
            }],
        };
        let mut out = Vec::new();
        write_region_statistics(&statistics, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("Region,Scaled Household Income,"));
        assert_eq!(lines.next().unwrap(), "TR1,1.5,,3,2,1,2,33.5");
        assert_eq!(region_statistics_file("22"), "RegionIncomeStatistics22.csv");
    }

    #[test]
    fn test_manifest_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        let manifest = RunManifest {
            generated_at: Utc::now(),
            years: vec![YearManifest {
                label: "23".to_owned(),
                year: 2023,
                households: 10,
                individuals: 25,
            }],
            regions: 3,
            outputs: vec![PathBuf::from(GINI_TABLE_FILE)],
        };
        manifest.save(&path).unwrap();
        let loaded: RunManifest =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, manifest);
    }
}
