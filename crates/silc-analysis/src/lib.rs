//! Regional aggregation of SILC household and personal microdata
//!
//! This crate turns the three delimited files of each survey year (household,
//! personal register, personal) into regional income statistics and regional
//! Gini coefficients by gender.
//!
//! # Overview
//!
//! 1. **Configure** ([`config::PipelineConfig`]): survey years, file names,
//!    outlier families, equivalence scale and column codes
//! 2. **Load** ([`load::RawSurveyYear`], [`table::DelimitedTable`]): read the
//!    files into canonical rows ([`record`])
//! 3. **Derive** ([`household`]): family composition, equivalence scale and
//!    scaled incomes
//! 4. **Join** ([`survey::SurveyYear`]): key-based left joins, outlier
//!    exclusion and working-age gender partitions
//! 5. **Aggregate** ([`region::RegionIncomeStatistics`],
//!    [`gini_table::RegionGiniTable`]): per-region means and Gini coefficients
//! 6. **Export** ([`export`]): `RegionGINI.csv`,
//!    `RegionIncomeStatistics<YY>.csv` and a `run_summary.json` manifest
//!
//! [`pipeline::run`] drives steps 2 to 5 and [`pipeline::PipelineOutput::write`]
//! performs step 6. [`summary::InequalitySummary`] reports every metric of
//! `silc-metrics` for a single distribution.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//!
//! use silc_analysis::{config::PipelineConfig, pipeline};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let config = PipelineConfig::default();
//! let output = pipeline::run(&config, Path::new("data"))?;
//! let manifest = output.write(Path::new("out"))?;
//! println!("wrote {} files", manifest.outputs.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod export;
pub mod gini_table;
pub mod household;
pub mod load;
pub mod pipeline;
pub mod record;
pub mod region;
pub mod summary;
pub mod survey;
pub mod table;
