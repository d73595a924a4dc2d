//! Theil inequality index
//!
//! ```text
//! T = Σ (x_i / total) * ln(N * x_i / total)
//! ```
//!
//! The sum runs over strictly positive observations and `N` counts only those
//! observations. Zero incomes follow the `0 * ln(0) = 0` convention and drop
//! out of the index entirely, so `T([0, 1, 1, 1, 1]) == T([1, 1, 1, 1])`.

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum TheilError {
    #[display("Theil index of an empty distribution is undefined")]
    Empty,
    #[display("Theil index requires non-negative incomes (observation #{index} is {value})")]
    NegativeValue { index: usize, value: f64 },
    #[display("Theil index is undefined when total income is zero")]
    ZeroTotal,
}

/// Computes the Theil index of `values`.
///
/// # Examples
///
/// ```
/// use silc_metrics::theil::theil_index;
///
/// assert_eq!(theil_index(&[1.0, 1.0, 1.0, 1.0]).unwrap(), 0.0);
/// let t = theil_index(&[1.0, 3.0]).unwrap();
/// assert!((t - (0.25 * 0.5_f64.ln() + 0.75 * 1.5_f64.ln())).abs() < 1e-12);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn theil_index(values: &[f64]) -> Result<f64, TheilError> {
    if values.is_empty() {
        return Err(TheilError::Empty);
    }
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| **v < 0.0) {
        return Err(TheilError::NegativeValue { index, value });
    }

    let positive = values.iter().copied().filter(|x| *x > 0.0).collect::<Vec<_>>();
    let total = positive.iter().sum::<f64>();
    if total == 0.0 {
        return Err(TheilError::ZeroTotal);
    }

    let n = positive.len() as f64;
    Ok(positive
        .iter()
        .map(|x| {
            let share = x / total;
            share * (n * share).ln()
        })
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_equality() {
        assert_eq!(theil_index(&[1.0, 1.0, 1.0, 1.0]).unwrap(), 0.0);
        assert!(theil_index(&[12_500.0; 9]).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_zero_entries_are_excluded() {
        assert_eq!(
            theil_index(&[0.0, 1.0, 1.0, 1.0, 1.0]).unwrap(),
            theil_index(&[1.0, 1.0, 1.0, 1.0]).unwrap()
        );
        assert_eq!(
            theil_index(&[0.0, 2.0, 0.0, 6.0]).unwrap(),
            theil_index(&[2.0, 6.0]).unwrap()
        );
    }

    #[test]
    fn test_skewed_split_is_bounded_by_ln_n() {
        let t = theil_index(&[1.0, 1.0, 1.0, 97.0]).unwrap();
        assert!(t > 0.0 && t < 4.0_f64.ln());
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(theil_index(&[]), Err(TheilError::Empty));
        assert_eq!(theil_index(&[0.0, 0.0]), Err(TheilError::ZeroTotal));
        assert_eq!(
            theil_index(&[3.0, -1.0]),
            Err(TheilError::NegativeValue {
                index: 1,
                value: -1.0
            })
        );
    }
}
