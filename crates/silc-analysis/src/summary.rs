//! Inequality report for one distribution
//!
//! An [`InequalitySummary`] gathers every metric of a labelled distribution.
//! A metric whose domain requirements are not met (for example the Atkinson
//! index over a distribution containing zero incomes) keeps its error, so
//! one undefined metric never hides the others.

use std::fmt;

use serde::{Deserialize, Serialize};
use silc_metrics::{
    atkinson::{AtkinsonError, DEFAULT_EPSILON},
    descriptive::DescriptiveStats,
    distribution::IncomeDistribution,
    gini::GiniError,
    percentile_ratio::{PercentileRatio, PercentileRatioError},
    share_ratio::{ShareRatio, ShareRatioError},
    theil::TheilError,
};

/// Fractions and aversion parameter used by [`InequalitySummary::compute`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryOptions {
    pub share_top_fraction: f64,
    pub share_bottom_fraction: f64,
    pub percentile_top_fraction: f64,
    pub percentile_bottom_fraction: f64,
    pub atkinson_epsilon: f64,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            share_top_fraction: 0.2,
            share_bottom_fraction: 0.2,
            percentile_top_fraction: 0.1,
            percentile_bottom_fraction: 0.1,
            atkinson_epsilon: DEFAULT_EPSILON,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InequalitySummary {
    pub label: Option<String>,
    pub descriptive: Option<DescriptiveStats>,
    pub share_ratio: Result<ShareRatio, ShareRatioError>,
    pub percentile_ratio: Result<PercentileRatio, PercentileRatioError>,
    pub gini: Result<f64, GiniError>,
    pub atkinson_epsilon: f64,
    pub atkinson: Result<f64, AtkinsonError>,
    pub theil: Result<f64, TheilError>,
}

impl InequalitySummary {
    /// Computes every metric of `distribution`.
    ///
    /// # Examples
    ///
    /// ```
    /// use silc_analysis::summary::{InequalitySummary, SummaryOptions};
    /// use silc_metrics::distribution::IncomeDistribution;
    ///
    /// let distribution = IncomeDistribution::new([0.0, 10.0, 20.0, 30.0, 40.0])
    ///     .unwrap()
    ///     .with_label("Household Income");
    /// let summary = InequalitySummary::compute(&distribution, SummaryOptions::default());
    /// assert!(summary.gini.is_ok());
    /// // Atkinson requires strictly positive incomes
    /// assert!(summary.atkinson.is_err());
    /// assert!(summary.to_string().starts_with("Dataset: Household Income"));
    /// ```
    #[must_use]
    pub fn compute(distribution: &IncomeDistribution, options: SummaryOptions) -> Self {
        Self {
            label: distribution.label().map(str::to_owned),
            descriptive: distribution.descriptive(),
            share_ratio: distribution
                .share_ratio(options.share_top_fraction, options.share_bottom_fraction),
            percentile_ratio: distribution.percentile_ratio(
                options.percentile_top_fraction,
                options.percentile_bottom_fraction,
            ),
            gini: distribution.gini(),
            atkinson_epsilon: options.atkinson_epsilon,
            atkinson: distribution.atkinson_index(options.atkinson_epsilon),
            theil: distribution.theil_index(),
        }
    }
}

// Reports print without their own dataset line; the summary prints it once.
impl fmt::Display for InequalitySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.label {
            writeln!(f, "Dataset: {label}")?;
        }
        match &self.descriptive {
            Some(stats) => {
                writeln!(f, "Observations: {}", stats.count)?;
                writeln!(f, "Mean: {:.2}", stats.mean)?;
                writeln!(f, "Median: {:.2}", stats.median)?;
                writeln!(f, "Min / Max: {:.2} / {:.2}", stats.min, stats.max)?;
            }
            None => writeln!(f, "Observations: 0")?,
        }
        match &self.share_ratio {
            Ok(report) => writeln!(
                f,
                "{}",
                ShareRatio {
                    label: None,
                    ..report.clone()
                }
            )?,
            Err(err) => writeln!(f, "Share ratio: {err}")?,
        }
        match &self.percentile_ratio {
            Ok(report) => writeln!(
                f,
                "{}",
                PercentileRatio {
                    label: None,
                    ..report.clone()
                }
            )?,
            Err(err) => writeln!(f, "Percentile ratio: {err}")?,
        }
        match self.gini {
            Ok(gini) => writeln!(f, "GINI Coefficient: {gini:.4}")?,
            Err(ref err) => writeln!(f, "GINI Coefficient: {err}")?,
        }
        match self.atkinson {
            Ok(index) => writeln!(
                f,
                "Atkinson Index (epsilon = {}): {index:.4}",
                self.atkinson_epsilon
            )?,
            Err(ref err) => writeln!(
                f,
                "Atkinson Index (epsilon = {}): {err}",
                self.atkinson_epsilon
            )?,
        }
        match self.theil {
            Ok(index) => write!(f, "Theil Index: {index:.4}"),
            Err(ref err) => write!(f, "Theil Index: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_defined() {
        let distribution = IncomeDistribution::new((1..=10).map(f64::from))
            .unwrap()
            .with_label("Scaled Household Income - 2023");
        let summary = InequalitySummary::compute(&distribution, SummaryOptions::default());

        assert_eq!(summary.share_ratio.as_ref().unwrap().ratio, 19.0 / 3.0);
        assert_eq!(summary.percentile_ratio.as_ref().unwrap().ratio, 9.0);
        assert!(summary.atkinson.is_ok());
        assert!(summary.theil.is_ok());

        let text = summary.to_string();
        assert_eq!(text.matches("Dataset:").count(), 1);
        assert!(text.contains("S80/S20 Ratio: 6.33"));
        assert!(text.contains("P90/P10 Ratio: 9.00"));
        assert!(text.contains("Atkinson Index (epsilon = 0.5): "));
    }

    #[test]
    fn test_undefined_metrics_keep_their_errors() {
        let distribution = IncomeDistribution::new([0.0, 0.0, 0.0, 5.0]).unwrap();
        let summary = InequalitySummary::compute(&distribution, SummaryOptions::default());
        assert!(matches!(
            summary.share_ratio,
            Err(ShareRatioError::ZeroBottomIncome { .. })
        ));
        assert!(summary.gini.is_ok());
        assert!(matches!(
            summary.atkinson,
            Err(AtkinsonError::NonPositiveValue { .. })
        ));

        let text = summary.to_string();
        assert!(text.starts_with("Observations: 4"));
        assert!(text.contains("Share ratio: "));
    }

    #[test]
    fn test_empty_distribution() {
        let distribution = IncomeDistribution::new(Vec::new()).unwrap();
        let summary = InequalitySummary::compute(&distribution, SummaryOptions::default());
        assert_eq!(summary.descriptive, None);
        assert_eq!(summary.gini, Err(GiniError::Empty));
        assert!(summary.to_string().starts_with("Observations: 0"));
    }
}
