//! Income inequality metrics for survey microdata.
//!
//! This crate provides pure, stateless functions over income distributions:
//!
//! - **Share ratios**: Income share of the richest slice versus the poorest slice (S80/S20)
//! - **Percentile ratios**: Nearest-rank percentile comparisons (P90/P10)
//! - **Gini coefficient**: Mean-rank inequality measure in `[0, 1]`
//! - **Lorenz curve**: Cumulative population share versus cumulative income share
//! - **Atkinson index**: Welfare-based inequality with an aversion parameter
//! - **Theil index**: Entropy-based inequality measure
//! - **Descriptive statistics**: Count, sum, mean, median and spread
//!
//! Every metric sorts its own copy of the input, so results never depend on the
//! order in which observations are supplied. Each metric reports its own error
//! type; degenerate inputs (zero totals, non-positive values where positivity
//! is required, out-of-range percentile ranks) are errors and are never turned
//! into `NaN` or infinity.
//!
//! # Modules
//!
//! - [`distribution`]: Labelled income distributions with convenience accessors for every metric
//! - [`descriptive`]: Descriptive statistics
//! - [`share_ratio`]: Top/bottom income share ratios
//! - [`percentile_ratio`]: Rank-based percentile ratios
//! - [`gini`]: Gini coefficient
//! - [`lorenz`]: Lorenz curve data
//! - [`atkinson`]: Atkinson index
//! - [`theil`]: Theil index
//!
//! # Examples
//!
//! ## Computing the Gini coefficient
//!
//! ```
//! use silc_metrics::gini::gini;
//!
//! let incomes = [10_000.0, 20_000.0, 30_000.0, 40_000.0, 100_000.0];
//! let coefficient = gini(&incomes).unwrap();
//! assert!((coefficient - 0.4).abs() < 1e-12);
//! ```
//!
//! ## Reporting on a labelled distribution
//!
//! ```
//! use silc_metrics::distribution::IncomeDistribution;
//!
//! let distribution = IncomeDistribution::new([1.0, 2.0, 3.0, 4.0, 10.0])
//!     .unwrap()
//!     .with_label("Scaled Household Income");
//!
//! let share = distribution.share_ratio(0.2, 0.2).unwrap();
//! assert_eq!(share.ratio, 10.0);
//! println!("{share}");
//! ```
//!
//! ## Comparing inequality measures
//!
//! ```
//! use silc_metrics::{atkinson, theil};
//!
//! let equal = [5.0, 5.0, 5.0, 5.0];
//! assert!(atkinson::atkinson_index(&equal, atkinson::DEFAULT_EPSILON).unwrap().abs() < 1e-12);
//! assert!(theil::theil_index(&equal).unwrap().abs() < 1e-12);
//! ```

pub mod atkinson;
pub mod descriptive;
pub mod distribution;
pub mod gini;
pub mod lorenz;
pub mod percentile_ratio;
pub mod share_ratio;
pub mod theil;

pub(crate) fn sorted_ascending(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

pub(crate) fn sorted_descending(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    sorted
}

/// Formats a fraction as a whole percentage label, e.g. `0.2` as `20`.
pub(crate) fn percent_label(fraction: f64) -> String {
    format!("{:.0}", fraction * 100.0)
}
