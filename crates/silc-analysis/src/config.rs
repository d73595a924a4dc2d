//! Pipeline configuration
//!
//! Every tunable of the analysis is named here: the survey years and their
//! input files, the families excluded as known data-entry errors, the
//! OECD-modified equivalence scale, the age thresholds, the education-years
//! lookup table, the gender codes and the raw column codes of the survey
//! files. [`PipelineConfig::default`] reproduces the published SILC 2022/2023
//! analysis; a JSON file can override any part of it.
//!
//! ```json
//! {
//!   "years": [
//!     {
//!       "label": "23",
//!       "year": 2023,
//!       "household_file": "gyk23_h.csv",
//!       "personal_file": "gyk23_f.csv",
//!       "personal_record_file": "gyk23_fk.csv",
//!       "delimiter": ",",
//!       "excluded_families": []
//!     }
//!   ],
//!   "equivalence_scale": { "first_adult": 1.0, "additional_adult": 0.5, "child": 0.3 }
//! }
//! ```

use std::{
    collections::{BTreeMap, BTreeSet},
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("failed to open configuration file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[display("failed to parse configuration file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("configuration lists no survey years")]
    NoYears,
    #[display("survey year label '{label}' is configured more than once")]
    DuplicateYear { label: String },
    #[display("delimiter of survey year '{label}' must be a single ASCII character")]
    InvalidDelimiter { label: String },
}

/// Complete configuration of the aggregation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Survey years in chronological order; the last one drives the Gini table ordering.
    pub years: Vec<SurveyYearConfig>,
    pub equivalence_scale: EquivalenceScale,
    /// Members older than this age count as adults in the equivalence scale.
    pub adult_age_threshold: u32,
    /// Individuals older than this age enter the gender partitions.
    pub working_age_threshold: u32,
    pub gender_codes: GenderCodes,
    /// Education-level code to years of education.
    pub education_years: BTreeMap<u32, f64>,
    pub columns: ColumnNames,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            years: vec![
                SurveyYearConfig::standard("22", 2022, ';', &[9292, 9289]),
                SurveyYearConfig::standard("23", 2023, ',', &[]),
            ],
            equivalence_scale: EquivalenceScale::default(),
            adult_age_threshold: 14,
            working_age_threshold: 14,
            gender_codes: GenderCodes::default(),
            education_years: default_education_years(),
            columns: ColumnNames::default(),
        }
    }
}

impl PipelineConfig {
    /// Loads a configuration from a JSON file; missing keys keep their defaults.
    pub fn load<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Open {
            path: path.to_owned(),
            source,
        })?;
        let config: Self = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            ConfigError::Parse {
                path: path.to_owned(),
                source,
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.years.is_empty() {
            return Err(ConfigError::NoYears);
        }
        let mut labels = BTreeSet::new();
        for year in &self.years {
            if !labels.insert(year.label.as_str()) {
                return Err(ConfigError::DuplicateYear {
                    label: year.label.clone(),
                });
            }
            if !year.delimiter.is_ascii() {
                return Err(ConfigError::InvalidDelimiter {
                    label: year.label.clone(),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn year(&self, label: &str) -> Option<&SurveyYearConfig> {
        self.years.iter().find(|year| year.label == label)
    }

    #[must_use]
    pub fn years_of_education(&self, education_code: u32) -> Option<f64> {
        self.education_years.get(&education_code).copied()
    }
}

/// Input files and cleaning rules of a single survey year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyYearConfig {
    /// Short label used in output file names, e.g. `"22"`.
    pub label: String,
    /// Calendar year used in output column names, e.g. `2022`.
    pub year: i32,
    pub household_file: PathBuf,
    pub personal_file: PathBuf,
    pub personal_record_file: PathBuf,
    pub delimiter: char,
    /// Families dropped from every downstream computation.
    #[serde(default)]
    pub excluded_families: Vec<u64>,
}

impl SurveyYearConfig {
    /// Configuration using the `gyk{label}_h.csv`, `gyk{label}_f.csv` and
    /// `gyk{label}_fk.csv` naming of the published microdata.
    #[must_use]
    pub fn standard(label: &str, year: i32, delimiter: char, excluded_families: &[u64]) -> Self {
        Self {
            label: label.to_owned(),
            year,
            household_file: PathBuf::from(format!("gyk{label}_h.csv")),
            personal_file: PathBuf::from(format!("gyk{label}_f.csv")),
            personal_record_file: PathBuf::from(format!("gyk{label}_fk.csv")),
            delimiter,
            excluded_families: excluded_families.to_vec(),
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn delimiter_byte(&self) -> u8 {
        debug_assert!(self.delimiter.is_ascii());
        self.delimiter as u8
    }
}

/// Coefficients of the OECD-modified equivalence scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquivalenceScale {
    pub first_adult: f64,
    pub additional_adult: f64,
    pub child: f64,
}

impl Default for EquivalenceScale {
    fn default() -> Self {
        Self {
            first_adult: 1.0,
            additional_adult: 0.5,
            child: 0.3,
        }
    }
}

impl EquivalenceScale {
    /// Computes `first + additional * (adults - 1) + child * children`.
    ///
    /// The formula is applied as is, so a family whose only members are
    /// children still has the `adults - 1` term subtracted.
    ///
    /// # Examples
    ///
    /// ```
    /// use silc_analysis::config::EquivalenceScale;
    ///
    /// let scale = EquivalenceScale::default();
    /// assert!((scale.factor(2, 1) - 1.8).abs() < 1e-12);
    /// assert_eq!(scale.factor(1, 0), 1.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn factor(&self, adults: usize, children: usize) -> f64 {
        self.first_adult
            + self.additional_adult * (adults as f64 - 1.0)
            + self.child * children as f64
    }
}

/// Numeric codes of the gender column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderCodes {
    pub male: u32,
    pub female: u32,
}

impl Default for GenderCodes {
    fn default() -> Self {
        Self { male: 1, female: 2 }
    }
}

/// Raw column codes of the survey files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub family: String,
    pub individual: String,
    pub region: String,
    pub household_weight: String,
    pub household_income: String,
    /// Transfer-income components summed into the household transfers.
    pub transfers: Vec<String>,
    pub record_weight: String,
    pub age: String,
    pub gender: String,
    pub education: String,
    pub place_of_work: String,
    pub personal_income: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            family: "BULTEN".to_owned(),
            individual: "FERT_ID".to_owned(),
            region: "HB031".to_owned(),
            household_weight: "HB040".to_owned(),
            household_income: "HG110".to_owned(),
            transfers: ["HG030N", "HG030A", "HG040", "HG050N", "HG050A", "HG060N", "HG060A"]
                .map(str::to_owned)
                .to_vec(),
            record_weight: "FK050".to_owned(),
            age: "FK070".to_owned(),
            gender: "FK090".to_owned(),
            education: "FE030".to_owned(),
            place_of_work: "FI145".to_owned(),
            personal_income: "FG140".to_owned(),
        }
    }
}

fn default_education_years() -> BTreeMap<u32, f64> {
    BTreeMap::from([
        (0, 0.0),
        (1, 0.0),
        (2, 5.0),
        (3, 4.0),
        (4, 8.0),
        (5, 11.5),
        (6, 11.5),
        (7, 13.5),
        (8, 15.5),
        (9, 17.5),
        (10, 22.5),
    ])
}
