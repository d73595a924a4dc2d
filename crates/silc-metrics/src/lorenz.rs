//! Lorenz curve data
//!
//! A [`LorenzCurve`] holds the cumulative share of population (x) against the
//! cumulative share of income (y) for an ascending sort of the observations,
//! together with the Gini coefficient of the same data. It is a renderable
//! dataset: drawing it (axes, colours, the decile grid) is left to the caller.

use crate::gini::{self, GiniError};

/// Population shares at which decile gridlines are drawn.
pub const DECILE_GRID: [f64; 11] = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum LorenzError {
    #[display("Lorenz curve of an empty distribution is undefined")]
    Empty,
    #[display("Lorenz curve is undefined when total income is zero")]
    ZeroTotal,
}

impl From<GiniError> for LorenzError {
    fn from(err: GiniError) -> Self {
        match err {
            GiniError::Empty => Self::Empty,
            GiniError::ZeroTotal => Self::ZeroTotal,
        }
    }
}

/// Lorenz curve of an income distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct LorenzCurve {
    /// Cumulative share of population: `N` evenly spaced points from 0 to 1.
    pub population_share: Vec<f64>,
    /// Cumulative share of income at each point.
    pub income_share: Vec<f64>,
    /// Gini coefficient of the same observations.
    pub gini: f64,
}

impl LorenzCurve {
    /// Builds the curve from unsorted values.
    ///
    /// # Examples
    ///
    /// ```
    /// use silc_metrics::lorenz::LorenzCurve;
    ///
    /// let curve = LorenzCurve::new(&[3.0, 1.0, 2.0, 4.0]).unwrap();
    /// assert_eq!(curve.population_share.len(), 4);
    /// assert_eq!(curve.income_share, vec![0.1, 0.3, 0.6, 1.0]);
    /// assert_eq!(curve.legend(), "GINI Coefficient: 0.2500");
    /// ```
    pub fn new(values: &[f64]) -> Result<Self, LorenzError> {
        if values.is_empty() {
            return Err(LorenzError::Empty);
        }
        let gini = gini::gini(values)?;

        let sorted = crate::sorted_ascending(values);
        let total = sorted.iter().sum::<f64>();
        let income_share = sorted
            .iter()
            .scan(0.0, |cumulative, x| {
                *cumulative += x;
                Some(*cumulative / total)
            })
            .collect();

        Ok(Self {
            population_share: linspace(sorted.len()),
            income_share,
            gini,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.population_share.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.population_share.is_empty()
    }

    /// Returns the curve as `(population_share, income_share)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.population_share
            .iter()
            .copied()
            .zip(self.income_share.iter().copied())
    }

    /// Returns the 45-degree equality line sampled at the curve's x positions.
    pub fn equality_line(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.population_share.iter().map(|&x| (x, x))
    }

    /// Legend entry reporting the Gini coefficient to four decimal places.
    #[must_use]
    pub fn legend(&self) -> String {
        format!("GINI Coefficient: {:.4}", self.gini)
    }
}

#[expect(clippy::cast_precision_loss)]
fn linspace(n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![0.0],
        _ => {
            let step = 1.0 / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { 1.0 } else { i as f64 * step })
                .collect()
        }
    }
}
