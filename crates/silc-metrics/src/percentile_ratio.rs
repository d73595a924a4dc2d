//! Rank-based percentile ratios
//!
//! The percentile values are looked up by nearest rank on the ascending sort,
//! zero-indexed with a `-1` offset:
//!
//! ```text
//! top_index    = floor((1 - top_fraction) * N) - 1
//! bottom_index = floor(bottom_fraction * N) - 1
//! ```
//!
//! No interpolation takes place and indices are never clamped: a rank that
//! falls outside `[0, N - 1]` is an [`PercentileRatioError::IndexOutOfRange`].
//! This convention matches the reference outputs of the survey tables exactly.

use std::fmt;

use crate::{percent_label, sorted_ascending};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum PercentileRatioError {
    #[display("percentile ratio of an empty distribution is undefined")]
    Empty,
    #[display("{name} fraction must lie in [0, 1] (got {value})")]
    InvalidFraction { name: &'static str, value: f64 },
    #[display("{name} percentile index {index} is out of range for {len} observations")]
    IndexOutOfRange {
        name: &'static str,
        index: i64,
        len: usize,
    },
    #[display("bottom percentile value is zero")]
    ZeroBottomValue,
}

/// Percentile ratio report for a single distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentileRatio {
    /// Reporting label of the distribution, if any.
    pub label: Option<String>,
    pub top_fraction: f64,
    pub bottom_fraction: f64,
    /// Zero-based index of the top percentile in the ascending sort.
    pub top_index: usize,
    /// Zero-based index of the bottom percentile in the ascending sort.
    pub bottom_index: usize,
    pub top_value: f64,
    pub bottom_value: f64,
    /// `top_value / bottom_value`.
    pub ratio: f64,
}

impl PercentileRatio {
    /// Computes the percentile ratio of `values`.
    ///
    /// # Examples
    ///
    /// ```
    /// use silc_metrics::percentile_ratio::PercentileRatio;
    ///
    /// let incomes = (1..=10).map(f64::from).collect::<Vec<_>>();
    /// let report = PercentileRatio::new(&incomes, 0.1, 0.1).unwrap();
    /// // floor(0.9 * 10) - 1 = 8, floor(0.1 * 10) - 1 = 0
    /// assert_eq!(report.top_value, 9.0);
    /// assert_eq!(report.bottom_value, 1.0);
    /// assert_eq!(report.ratio, 9.0);
    /// ```
    pub fn new(
        values: &[f64],
        top_fraction: f64,
        bottom_fraction: f64,
    ) -> Result<Self, PercentileRatioError> {
        check_fraction("top", top_fraction)?;
        check_fraction("bottom", bottom_fraction)?;
        if values.is_empty() {
            return Err(PercentileRatioError::Empty);
        }

        let sorted = sorted_ascending(values);
        let len = sorted.len();
        let top_index = rank_index("top", 1.0 - top_fraction, len)?;
        let bottom_index = rank_index("bottom", bottom_fraction, len)?;

        let top_value = sorted[top_index];
        let bottom_value = sorted[bottom_index];
        if bottom_value == 0.0 {
            return Err(PercentileRatioError::ZeroBottomValue);
        }

        Ok(Self {
            label: None,
            top_fraction,
            bottom_fraction,
            top_index,
            bottom_index,
            top_value,
            bottom_value,
            ratio: top_value / bottom_value,
        })
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]
fn rank_index(
    name: &'static str,
    fraction: f64,
    len: usize,
) -> Result<usize, PercentileRatioError> {
    let index = (fraction * len as f64) as i64 - 1;
    if index < 0 || index >= len as i64 {
        return Err(PercentileRatioError::IndexOutOfRange { name, index, len });
    }
    Ok(index as usize)
}

fn check_fraction(name: &'static str, value: f64) -> Result<(), PercentileRatioError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PercentileRatioError::InvalidFraction { name, value })
    }
}

impl fmt::Display for PercentileRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.label {
            writeln!(f, "Dataset: {label}")?;
        }
        let top = percent_label(1.0 - self.top_fraction);
        let bottom = percent_label(self.bottom_fraction);
        writeln!(f, "P{top}/P{bottom} Ratio: {:.2}", self.ratio)?;
        writeln!(
            f,
            "Income of the {top}th Percentile Family: {:.2}",
            self.top_value
        )?;
        write!(
            f,
            "Income of the {bottom}th Percentile Family: {:.2}",
            self.bottom_value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invariant_to_input_order() {
        let ascending = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let shuffled = [4.0, 9.0, 1.0, 6.0, 10.0, 3.0, 8.0, 2.0, 7.0, 5.0];
        assert_eq!(
            PercentileRatio::new(&ascending, 0.1, 0.1).unwrap(),
            PercentileRatio::new(&shuffled, 0.1, 0.1).unwrap()
        );
    }

    #[test]
    fn test_bottom_rank_selects_minimum() {
        for values in [
            vec![7.0, 3.0, 9.0, 5.0],
            vec![12.0, 4.0, 8.0, 20.0, 16.0],
            vec![13.0, 2.0, 11.0, 7.0, 5.0, 17.0, 3.0, 23.0, 19.0, 29.0],
        ] {
            #[expect(clippy::cast_precision_loss)]
            let bottom_fraction = 1.0 / values.len() as f64;
            let report = PercentileRatio::new(&values, 0.0, bottom_fraction).unwrap();
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(report.bottom_index, 0);
            assert_eq!(report.bottom_value, min);
            assert_eq!(report.top_value, max);
        }
    }

    #[test]
    fn test_off_by_one_convention() {
        let values = (1..=10).map(f64::from).collect::<Vec<_>>();
        let report = PercentileRatio::new(&values, 0.2, 0.2).unwrap();
        assert_eq!(report.top_index, 7);
        assert_eq!(report.bottom_index, 1);
        assert_eq!(report.top_value, 8.0);
        assert_eq!(report.bottom_value, 2.0);
        assert_eq!(report.ratio, 4.0);
    }

    #[test]
    fn test_bottom_index_below_range() {
        // floor(0.1 * 5) - 1 = -1
        let err = PercentileRatio::new(&[1.0, 2.0, 3.0, 4.0, 5.0], 0.1, 0.1).unwrap_err();
        assert_eq!(
            err,
            PercentileRatioError::IndexOutOfRange {
                name: "bottom",
                index: -1,
                len: 5
            }
        );
    }

    #[test]
    fn test_top_index_below_range() {
        // floor((1 - 1) * 3) - 1 = -1
        let err = PercentileRatio::new(&[1.0, 2.0, 3.0], 1.0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            PercentileRatioError::IndexOutOfRange { name: "top", .. }
        ));
    }

    #[test]
    fn test_empty_and_zero_bottom() {
        assert_eq!(
            PercentileRatio::new(&[], 0.1, 0.1),
            Err(PercentileRatioError::Empty)
        );
        assert_eq!(
            PercentileRatio::new(&[0.0, 1.0, 2.0, 3.0], 0.0, 0.25),
            Err(PercentileRatioError::ZeroBottomValue)
        );
    }

    #[test]
    fn test_display() {
        let values = (1..=10).map(f64::from).collect::<Vec<_>>();
        let text = PercentileRatio::new(&values, 0.1, 0.1).unwrap().to_string();
        assert!(text.contains("P90/P10 Ratio: 9.00"));
        assert!(text.contains("Income of the 90th Percentile Family: 9.00"));
        assert!(text.contains("Income of the 10th Percentile Family: 1.00"));
    }
}
