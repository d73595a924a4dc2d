//! Regional income statistics
//!
//! Per region, the unweighted mean of each household income field over the
//! households whose value is present, plus transfers as a percentage of
//! household income. Rows cover a given region list (the union over all
//! years), so a region absent from one year still gets a row of missing
//! values.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::{
    record::{Household, IncomeField},
    survey::SurveyYear,
};

/// Fields averaged per region, in export column order.
pub const REGION_FIELDS: [IncomeField; 6] = [
    IncomeField::ScaledIncome,
    IncomeField::ScaledIncomeWithoutTransfers,
    IncomeField::Income,
    IncomeField::IncomeWithoutTransfers,
    IncomeField::Transfers,
    IncomeField::EquivalenceScale,
];

pub const TRANSFERS_PCT_COLUMN: &str = "Transfers as % of Income";

#[derive(Debug, Clone, PartialEq)]
pub struct RegionIncomeRow {
    pub region: String,
    /// Means of [`REGION_FIELDS`], in the same order.
    pub means: [Option<f64>; REGION_FIELDS.len()],
    pub transfers_pct_of_income: Option<f64>,
}

impl RegionIncomeRow {
    #[must_use]
    pub fn mean(&self, field: IncomeField) -> Option<f64> {
        REGION_FIELDS
            .iter()
            .position(|f| *f == field)
            .and_then(|index| self.means[index])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionIncomeStatistics {
    pub label: String,
    pub year: i32,
    pub rows: Vec<RegionIncomeRow>,
}

impl RegionIncomeStatistics {
    /// Computes one row per entry of `regions`, in the iteration order of the set.
    #[must_use]
    pub fn compute(survey: &SurveyYear, regions: &BTreeSet<String>) -> Self {
        let rows = regions
            .iter()
            .map(|region| {
                let households = survey.households_in(region).collect::<Vec<_>>();
                if households.is_empty() {
                    debug!(year = survey.year, %region, "region has no households");
                }
                let means = REGION_FIELDS.map(|field| mean_of(&households, field));
                let transfers_pct_of_income = match (
                    mean_of(&households, IncomeField::Transfers),
                    mean_of(&households, IncomeField::Income),
                ) {
                    (Some(_), Some(income)) if income == 0.0 => {
                        warn!(
                            year = survey.year,
                            %region,
                            "mean household income is zero, transfer share undefined"
                        );
                        None
                    }
                    (Some(transfers), Some(income)) => Some(transfers / income * 100.0),
                    _ => None,
                };
                RegionIncomeRow {
                    region: region.clone(),
                    means,
                    transfers_pct_of_income,
                }
            })
            .collect();

        Self {
            label: survey.label.clone(),
            year: survey.year,
            rows,
        }
    }

    /// Header row of the exported table.
    #[must_use]
    pub fn column_names() -> Vec<&'static str> {
        let mut names = vec!["Region"];
        names.extend(REGION_FIELDS.map(IncomeField::column_name));
        names.push(TRANSFERS_PCT_COLUMN);
        names
    }
}

#[expect(clippy::cast_precision_loss)]
fn mean_of(households: &[&Household], field: IncomeField) -> Option<f64> {
    let values = households
        .iter()
        .filter_map(|household| field.value(household))
        .collect::<Vec<_>>();
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}
