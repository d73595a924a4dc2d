//! Gini coefficient
//!
//! The coefficient is computed from the descending sort with mid-point ranks:
//!
//! ```text
//! G = | (N - 2 * Σ_{i=1..N} (N - i + 0.5) * x_i / Σx) / N |
//! ```
//!
//! where `x_1 >= x_2 >= ... >= x_N`. The absolute value removes the sign that
//! the descending order introduces. The result is `0` for perfect equality and
//! `(N - 1) / N` when a single observation holds all income.
//!
//! Values should be non-negative for the coefficient to carry its usual
//! meaning. Negative values are accepted and produce a defined number; callers
//! decide whether to clean them first.

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GiniError {
    #[display("Gini coefficient of an empty distribution is undefined")]
    Empty,
    #[display("Gini coefficient is undefined when total income is zero")]
    ZeroTotal,
}

/// Computes the Gini coefficient of `values`.
///
/// # Examples
///
/// ```
/// use silc_metrics::gini::gini;
///
/// assert_eq!(gini(&[3.0, 3.0, 3.0]).unwrap(), 0.0);
/// let g = gini(&[1.0, 1.0, 1.0, 1.0, 100.0]).unwrap();
/// assert!((g - 792.0 / 1040.0).abs() < 1e-12);
/// ```
pub fn gini(values: &[f64]) -> Result<f64, GiniError> {
    if values.is_empty() {
        return Err(GiniError::Empty);
    }
    let sorted = crate::sorted_descending(values);
    gini_from_sorted_descending(&sorted)
}

/// Computes the Gini coefficient of values already sorted in descending order.
///
/// # Panics
///
/// Panics if `sorted_values` is not sorted in descending order.
#[expect(clippy::cast_precision_loss)]
pub fn gini_from_sorted_descending(sorted_values: &[f64]) -> Result<f64, GiniError> {
    assert!(
        sorted_values.is_sorted_by(|a, b| a >= b),
        "values must be sorted in descending order"
    );
    if sorted_values.is_empty() {
        return Err(GiniError::Empty);
    }

    let total = sorted_values.iter().sum::<f64>();
    if total == 0.0 {
        return Err(GiniError::ZeroTotal);
    }

    let n = sorted_values.len() as f64;
    let weighted = sorted_values
        .iter()
        .enumerate()
        .map(|(i, x)| (n - (i + 1) as f64 + 0.5) * x)
        .sum::<f64>();

    Ok(((n - 2.0 * weighted / total) / n).abs())
}
