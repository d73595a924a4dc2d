//! Atkinson inequality index
//!
//! The index compares the mean income with the equally-distributed-equivalent
//! income (EDE), the income that, if everyone received it, would give the same
//! social welfare as the observed distribution:
//!
//! ```text
//! EDE = (mean(x^(1 - ε)))^(1 / (1 - ε))     ε != 1
//! EDE = exp(mean(ln x))                      ε == 1
//! A   = 1 - EDE / mean(x)
//! ```
//!
//! The power means are taken over mean-normalised incomes `x / mean(x)`, so
//! large aversions do not underflow on realistic income levels. The aversion
//! parameter `ε` must be finite and non-negative. The result lies in `[0, 1]`,
//! approaching `1 - min(x) / mean(x)` as `ε` grows; higher values mean more
//! inequality.

/// Inequality aversion used when none is given.
pub const DEFAULT_EPSILON: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum AtkinsonError {
    #[display("Atkinson index of an empty distribution is undefined")]
    Empty,
    #[display("Atkinson index requires a finite, non-negative epsilon (got {epsilon})")]
    InvalidEpsilon { epsilon: f64 },
    #[display("Atkinson index requires positive incomes (observation #{index} is {value})")]
    NonPositiveValue { index: usize, value: f64 },
    #[display("Atkinson index is not finite for epsilon {epsilon}")]
    NonFiniteResult { epsilon: f64 },
}

/// Computes the Atkinson index of `values` for aversion `epsilon`.
///
/// # Examples
///
/// ```
/// use silc_metrics::atkinson::{atkinson_index, DEFAULT_EPSILON};
///
/// let index = atkinson_index(&[1.0, 4.0], DEFAULT_EPSILON).unwrap();
/// // EDE = ((1 + 2) / 2)^2 = 2.25, mean = 2.5
/// assert!((index - 0.1).abs() < 1e-12);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn atkinson_index(values: &[f64], epsilon: f64) -> Result<f64, AtkinsonError> {
    if !epsilon.is_finite() || epsilon < 0.0 {
        return Err(AtkinsonError::InvalidEpsilon { epsilon });
    }
    if values.is_empty() {
        return Err(AtkinsonError::Empty);
    }
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| **v <= 0.0) {
        return Err(AtkinsonError::NonPositiveValue { index, value });
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let relative = values.iter().map(|x| x / mean);
    // EDE / mean
    let ratio = if (epsilon - 1.0).abs() < f64::EPSILON {
        (relative.map(f64::ln).sum::<f64>() / n).exp()
    } else {
        let exponent = 1.0 - epsilon;
        (relative.map(|r| r.powf(exponent)).sum::<f64>() / n).powf(exponent.recip())
    };

    let index = 1.0 - ratio;
    if !index.is_finite() {
        return Err(AtkinsonError::NonFiniteResult { epsilon });
    }
    Ok(index)
}
