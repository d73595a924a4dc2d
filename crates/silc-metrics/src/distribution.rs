//! Labelled income distributions
//!
//! An [`IncomeDistribution`] is an order-irrelevant multiset of finite income
//! observations with an optional label (for example `"Scaled Household Income"`)
//! that report types carry into their printed output.
//!
//! Missing observations are represented upstream as absent values; they never
//! reach a distribution as `NaN`. Cleaning (zero-filling, flooring negative
//! incomes) is the caller's responsibility and no metric imputes.

use crate::{
    atkinson::{self, AtkinsonError},
    descriptive::DescriptiveStats,
    gini::{self, GiniError},
    lorenz::{LorenzCurve, LorenzError},
    percentile_ratio::{PercentileRatio, PercentileRatioError},
    share_ratio::{ShareRatio, ShareRatioError},
    theil::{self, TheilError},
};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum DistributionError {
    #[display("observation #{index} is not a finite number ({value})")]
    NonFiniteValue { index: usize, value: f64 },
}

/// A multiset of income observations with an optional reporting label.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeDistribution {
    label: Option<String>,
    values: Vec<f64>,
}

impl IncomeDistribution {
    /// Builds a distribution from finite values.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError::NonFiniteValue`] for the first `NaN` or
    /// infinite value.
    ///
    /// # Examples
    ///
    /// ```
    /// use silc_metrics::distribution::IncomeDistribution;
    ///
    /// let distribution = IncomeDistribution::new([3.0, 1.0, 2.0]).unwrap();
    /// assert_eq!(distribution.len(), 3);
    /// assert!(IncomeDistribution::new([1.0, f64::NAN]).is_err());
    /// ```
    pub fn new<I>(values: I) -> Result<Self, DistributionError>
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values.into_iter().collect::<Vec<_>>();
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(DistributionError::NonFiniteValue { index, value });
        }
        Ok(Self {
            label: None,
            values,
        })
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn descriptive(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.values.iter().copied())
    }

    /// Share ratio report carrying this distribution's label.
    pub fn share_ratio(
        &self,
        top_fraction: f64,
        bottom_fraction: f64,
    ) -> Result<ShareRatio, ShareRatioError> {
        let report = ShareRatio::new(&self.values, top_fraction, bottom_fraction)?;
        Ok(match &self.label {
            Some(label) => report.with_label(label.clone()),
            None => report,
        })
    }

    /// Percentile ratio report carrying this distribution's label.
    pub fn percentile_ratio(
        &self,
        top_fraction: f64,
        bottom_fraction: f64,
    ) -> Result<PercentileRatio, PercentileRatioError> {
        let report = PercentileRatio::new(&self.values, top_fraction, bottom_fraction)?;
        Ok(match &self.label {
            Some(label) => report.with_label(label.clone()),
            None => report,
        })
    }

    pub fn gini(&self) -> Result<f64, GiniError> {
        gini::gini(&self.values)
    }

    pub fn lorenz_curve(&self) -> Result<LorenzCurve, LorenzError> {
        LorenzCurve::new(&self.values)
    }

    pub fn atkinson_index(&self, epsilon: f64) -> Result<f64, AtkinsonError> {
        atkinson::atkinson_index(&self.values, epsilon)
    }

    pub fn theil_index(&self) -> Result<f64, TheilError> {
        theil::theil_index(&self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_infinite_value() {
        let err = IncomeDistribution::new([1.0, 2.0, f64::INFINITY]).unwrap_err();
        assert!(matches!(
            err,
            DistributionError::NonFiniteValue { index: 2, .. }
        ));
    }

    #[test]
    fn test_label_reaches_reports() {
        let distribution = IncomeDistribution::new([1.0, 2.0, 3.0, 4.0, 5.0])
            .unwrap()
            .with_label("Household Income");
        let share = distribution.share_ratio(0.2, 0.2).unwrap();
        assert_eq!(share.label.as_deref(), Some("Household Income"));
        let percentile = distribution.percentile_ratio(0.2, 0.2).unwrap();
        assert_eq!(percentile.label.as_deref(), Some("Household Income"));
    }

    #[test]
    fn test_negative_and_zero_values_are_kept() {
        let distribution = IncomeDistribution::new([-5.0, 0.0, 10.0]).unwrap();
        assert_eq!(distribution.values(), &[-5.0, 0.0, 10.0]);
        assert!(distribution.atkinson_index(0.5).is_err());
    }
}
