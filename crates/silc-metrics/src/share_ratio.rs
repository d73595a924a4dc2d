//! Income share ratios
//!
//! A share ratio compares the total income of the richest slice of a
//! population with the total income of the poorest slice. With a top fraction
//! of 0.2 and a bottom fraction of 0.2 this is the S80/S20 ratio.
//!
//! The two slices are sized independently by truncating `N × fraction`, so
//! they may overlap when the fractions add up to more than one. Overlap is
//! accepted and simply counts the shared observations on both sides.

use std::fmt;

use crate::{percent_label, sorted_descending};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ShareRatioError {
    #[display("share ratio of an empty distribution is undefined")]
    Empty,
    #[display("{name} fraction must lie in [0, 1] (got {value})")]
    InvalidFraction { name: &'static str, value: f64 },
    #[display("bottom {bottom_count} observations have zero total income")]
    ZeroBottomIncome { bottom_count: usize },
    #[display("distribution has zero total income")]
    ZeroTotalIncome,
}

/// Share ratio report for a single distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareRatio {
    /// Reporting label of the distribution, if any.
    pub label: Option<String>,
    /// Fraction of the population in the top slice.
    pub top_fraction: f64,
    /// Fraction of the population in the bottom slice.
    pub bottom_fraction: f64,
    /// Number of observations in the top slice.
    pub top_count: usize,
    /// Number of observations in the bottom slice.
    pub bottom_count: usize,
    /// Sum of the top slice.
    pub top_income: f64,
    /// Sum of the bottom slice.
    pub bottom_income: f64,
    /// Sum of the whole distribution.
    pub total_income: f64,
    /// `top_income / bottom_income`.
    pub ratio: f64,
    /// Top slice share of the total, in percent.
    pub top_share_pct: f64,
    /// Bottom slice share of the total, in percent.
    pub bottom_share_pct: f64,
}

impl ShareRatio {
    /// Computes the share ratio of `values`.
    ///
    /// # Arguments
    ///
    /// * `values` - Income observations in any order
    /// * `top_fraction` - Fraction of the population in the top slice (e.g. `0.2`)
    /// * `bottom_fraction` - Fraction of the population in the bottom slice (e.g. `0.2`)
    ///
    /// # Examples
    ///
    /// ```
    /// use silc_metrics::share_ratio::ShareRatio;
    ///
    /// let incomes = [10.0, 1.0, 4.0, 2.0, 3.0];
    /// let report = ShareRatio::new(&incomes, 0.2, 0.2).unwrap();
    /// assert_eq!(report.top_income, 10.0);
    /// assert_eq!(report.bottom_income, 1.0);
    /// assert_eq!(report.ratio, 10.0);
    /// ```
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn new(
        values: &[f64],
        top_fraction: f64,
        bottom_fraction: f64,
    ) -> Result<Self, ShareRatioError> {
        check_fraction("top", top_fraction)?;
        check_fraction("bottom", bottom_fraction)?;
        if values.is_empty() {
            return Err(ShareRatioError::Empty);
        }

        let sorted = sorted_descending(values);
        let n = sorted.len();
        let top_count = (n as f64 * top_fraction) as usize;
        let bottom_count = (n as f64 * bottom_fraction) as usize;

        let top_income = sorted[..top_count].iter().sum::<f64>();
        let bottom_income = sorted[n - bottom_count..].iter().sum::<f64>();
        let total_income = sorted.iter().sum::<f64>();

        if total_income == 0.0 {
            return Err(ShareRatioError::ZeroTotalIncome);
        }
        if bottom_income == 0.0 {
            return Err(ShareRatioError::ZeroBottomIncome { bottom_count });
        }

        Ok(Self {
            label: None,
            top_fraction,
            bottom_fraction,
            top_count,
            bottom_count,
            top_income,
            bottom_income,
            total_income,
            ratio: top_income / bottom_income,
            top_share_pct: top_income / total_income * 100.0,
            bottom_share_pct: bottom_income / total_income * 100.0,
        })
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

fn check_fraction(name: &'static str, value: f64) -> Result<(), ShareRatioError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ShareRatioError::InvalidFraction { name, value })
    }
}

impl fmt::Display for ShareRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.label {
            writeln!(f, "Dataset: {label}")?;
        }
        let top = percent_label(self.top_fraction);
        writeln!(
            f,
            "S{}/S{} Ratio: {:.2}",
            percent_label(1.0 - self.top_fraction),
            percent_label(self.bottom_fraction),
            self.ratio
        )?;
        writeln!(f, "Top {top} Share of Income: {:.2}%", self.top_share_pct)?;
        write!(
            f,
            "Bottom {} Share of Income: {:.2}%",
            percent_label(self.bottom_fraction),
            self.bottom_share_pct
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invariant_to_input_order() {
        let ascending = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let shuffled = [7.0, 2.0, 10.0, 1.0, 5.0, 9.0, 3.0, 8.0, 6.0, 4.0];
        let a = ShareRatio::new(&ascending, 0.2, 0.2).unwrap();
        let b = ShareRatio::new(&shuffled, 0.2, 0.2).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.top_income, 19.0);
        assert_eq!(a.bottom_income, 3.0);
        assert_eq!(a.total_income, 55.0);
    }

    #[test]
    fn test_shares_in_percent() {
        let report = ShareRatio::new(&[1.0, 1.0, 1.0, 1.0, 6.0], 0.2, 0.4).unwrap();
        assert_eq!(report.top_count, 1);
        assert_eq!(report.bottom_count, 2);
        assert!((report.top_share_pct - 60.0).abs() < 1e-12);
        assert!((report.bottom_share_pct - 20.0).abs() < 1e-12);
        assert!((report.ratio - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_overlapping_slices_are_accepted() {
        let report = ShareRatio::new(&[1.0, 2.0, 3.0, 4.0], 0.75, 0.75).unwrap();
        // Top: 4 + 3 + 2, bottom: 3 + 2 + 1
        assert_eq!(report.top_income, 9.0);
        assert_eq!(report.bottom_income, 6.0);
        assert!(report.top_share_pct + report.bottom_share_pct > 100.0);
    }

    #[test]
    fn test_empty_distribution() {
        assert_eq!(ShareRatio::new(&[], 0.2, 0.2), Err(ShareRatioError::Empty));
    }

    #[test]
    fn test_zero_bottom_income() {
        let err = ShareRatio::new(&[0.0, 0.0, 5.0, 10.0], 0.25, 0.5).unwrap_err();
        assert_eq!(err, ShareRatioError::ZeroBottomIncome { bottom_count: 2 });
    }

    #[test]
    fn test_empty_bottom_slice_is_zero_income() {
        // floor(3 * 0.2) = 0 observations in the bottom slice
        let err = ShareRatio::new(&[1.0, 2.0, 3.0], 0.2, 0.2).unwrap_err();
        assert_eq!(err, ShareRatioError::ZeroBottomIncome { bottom_count: 0 });
    }

    #[test]
    fn test_zero_total_income() {
        let err = ShareRatio::new(&[-1.0, 1.0], 0.5, 0.5).unwrap_err();
        assert_eq!(err, ShareRatioError::ZeroTotalIncome);
    }

    #[test]
    fn test_invalid_fraction() {
        let err = ShareRatio::new(&[1.0, 2.0], 1.5, 0.2).unwrap_err();
        assert!(matches!(
            err,
            ShareRatioError::InvalidFraction { name: "top", .. }
        ));
        assert!(ShareRatio::new(&[1.0, 2.0], 0.2, f64::NAN).is_err());
    }

    #[test]
    fn test_display() {
        let report = ShareRatio::new(&[10.0, 1.0, 4.0, 2.0, 3.0], 0.2, 0.2)
            .unwrap()
            .with_label("Income");
        let text = report.to_string();
        assert!(text.starts_with("Dataset: Income\n"));
        assert!(text.contains("S80/S20 Ratio: 10.00"));
        assert!(text.contains("Top 20 Share of Income: 50.00%"));
        assert!(text.contains("Bottom 20 Share of Income: 5.00%"));
    }
}
