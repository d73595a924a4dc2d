//! Gini coefficients by region, year and population group
//!
//! For every region and survey year three coefficients are computed:
//!
//! - **Women** and **Men**: individual incomes of the working-age gender
//!   partitions (missing and negative incomes set to zero)
//! - **Overall**: scaled household income of the region's households, taken
//!   as is
//!
//! The table columns are the gender columns of every year followed by the
//! overall column of every year. Rows are sorted ascending by the overall
//! coefficient of the last year; missing values sort last and ties keep the
//! region order.

use std::{cmp::Ordering, collections::BTreeSet};

use silc_metrics::gini::{self, GiniError};
use tracing::debug;

use crate::{
    record::{Gender, Household, Individual},
    survey::SurveyYear,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum GiniGroup {
    #[display("women")]
    Women,
    #[display("men")]
    Men,
    #[display("overall")]
    Overall,
}

impl GiniGroup {
    fn column_name(self, year: i32) -> String {
        match self {
            Self::Women => format!("GINI Coefficient for Women - {year}"),
            Self::Men => format!("GINI Coefficient for Men - {year}"),
            Self::Overall => format!("GINI Coefficient - {year}"),
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("failed to compute Gini coefficient for {group} in region {region} ({year}): {source}")]
pub struct GiniTableError {
    pub year: i32,
    pub region: String,
    pub group: GiniGroup,
    pub source: GiniError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionGiniRow {
    pub region: String,
    /// One value per entry of [`RegionGiniTable::columns`]; `None` for empty groups.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionGiniTable {
    /// `(year, group)` of each value column.
    pub columns: Vec<(i32, GiniGroup)>,
    pub rows: Vec<RegionGiniRow>,
}

impl RegionGiniTable {
    /// Computes the table over `regions` for the surveys in chronological order.
    pub fn compute(
        surveys: &[SurveyYear],
        regions: &BTreeSet<String>,
        working_age_threshold: u32,
    ) -> Result<Self, GiniTableError> {
        // (survey index, group) of each value column
        let sources = (0..surveys.len())
            .flat_map(|index| [(index, GiniGroup::Women), (index, GiniGroup::Men)])
            .chain((0..surveys.len()).map(|index| (index, GiniGroup::Overall)))
            .collect::<Vec<_>>();
        let columns = sources
            .iter()
            .map(|&(index, group)| (surveys[index].year, group))
            .collect::<Vec<_>>();

        let partitions = surveys
            .iter()
            .map(|survey| {
                (
                    survey.working_age(Gender::Female, working_age_threshold),
                    survey.working_age(Gender::Male, working_age_threshold),
                )
            })
            .collect::<Vec<_>>();

        let mut rows = Vec::with_capacity(regions.len());
        for region in regions {
            let mut values = Vec::with_capacity(columns.len());
            for &(index, group) in &sources {
                let year = surveys[index].year;
                let incomes = match group {
                    GiniGroup::Women => partition_incomes(&partitions[index].0, region),
                    GiniGroup::Men => partition_incomes(&partitions[index].1, region),
                    GiniGroup::Overall => surveys[index]
                        .households_in(region)
                        .filter_map(Household::scaled_income)
                        .collect(),
                };
                values.push(group_gini(&incomes, year, region, group)?);
            }
            rows.push(RegionGiniRow {
                region: region.clone(),
                values,
            });
        }

        let mut table = Self { columns, rows };
        table.sort_by_last_column();
        Ok(table)
    }

    /// Header row of the exported table.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        std::iter::once("Region".to_owned())
            .chain(
                self.columns
                    .iter()
                    .map(|&(year, group)| group.column_name(year)),
            )
            .collect()
    }

    #[must_use]
    pub fn value(&self, region: &str, year: i32, group: GiniGroup) -> Option<f64> {
        let column = self.columns.iter().position(|c| *c == (year, group))?;
        self.rows
            .iter()
            .find(|row| row.region == region)?
            .values[column]
    }

    fn sort_by_last_column(&mut self) {
        self.rows.sort_by(|a, b| match (a.values.last(), b.values.last()) {
            (Some(Some(a)), Some(Some(b))) => a.total_cmp(b),
            (Some(Some(_)), _) => Ordering::Less,
            (_, Some(Some(_))) => Ordering::Greater,
            _ => Ordering::Equal,
        });
    }
}

fn partition_incomes(partition: &[Individual], region: &str) -> Vec<f64> {
    partition
        .iter()
        .filter(|individual| individual.region() == Some(region))
        .filter_map(|individual| individual.income)
        .collect()
}

fn group_gini(
    incomes: &[f64],
    year: i32,
    region: &str,
    group: GiniGroup,
) -> Result<Option<f64>, GiniTableError> {
    if incomes.is_empty() {
        debug!(year, region, %group, "no observations, leaving Gini cell empty");
        return Ok(None);
    }
    gini::gini(incomes)
        .map(Some)
        .map_err(|source| GiniTableError {
            year,
            region: region.to_owned(),
            group,
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn household(family: u64, region: &str, income: f64) -> Household {
        Household {
            family,
            region: Some(region.to_owned()),
            weight: Some(1.0),
            income: Some(income),
            transfers: 0.0,
            average_years_of_education: None,
            adults: 1,
            children: 0,
            equivalence_scale: Some(1.0),
        }
    }

    fn person(household: &Household, gender: Gender, income: Option<f64>) -> Individual {
        Individual {
            family: household.family,
            individual: 1,
            record_weight: None,
            age: Some(30),
            gender,
            education: None,
            years_of_education: None,
            place_of_work: None,
            income,
            household: Some(household.clone()),
        }
    }

    fn survey(year: i32, households: Vec<Household>, individuals: Vec<Individual>) -> SurveyYear {
        SurveyYear {
            label: (year % 100).to_string(),
            year,
            households,
            individuals,
        }
    }

    fn regions(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|name| (*name).to_owned()).collect()
    }

    #[test]
    fn test_five_household_region() {
        let households = [10_000.0, 20_000.0, 30_000.0, 40_000.0, 100_000.0]
            .into_iter()
            .zip(1..)
            .map(|(income, family)| household(family, "TR1", income))
            .collect::<Vec<_>>();
        let individuals = vec![
            person(&households[0], Gender::Female, Some(-10.0)),
            person(&households[1], Gender::Female, Some(10.0)),
        ];
        let surveys = [survey(2023, households, individuals)];
        let table = RegionGiniTable::compute(&surveys, &regions(&["TR1"]), 14).unwrap();

        let overall = table.value("TR1", 2023, GiniGroup::Overall).unwrap();
        assert!((overall - 0.4).abs() < 1e-12);
        // Floored partition [0, 10] has a single positive value among two
        let women = table.value("TR1", 2023, GiniGroup::Women).unwrap();
        assert!((women - 0.5).abs() < 1e-12);
        assert_eq!(table.value("TR1", 2023, GiniGroup::Men), None);
    }

    #[test]
    fn test_columns_and_sorting() {
        let y22 = survey(
            2022,
            vec![household(1, "TR1", 1.0), household(2, "TR2", 5.0)],
            vec![],
        );
        let y23 = survey(
            2023,
            vec![
                household(1, "TR1", 1.0),
                household(2, "TR1", 9.0),
                household(3, "TR2", 4.0),
                household(4, "TR2", 6.0),
            ],
            vec![],
        );
        let table =
            RegionGiniTable::compute(&[y22, y23], &regions(&["TR1", "TR2", "TR3"]), 14).unwrap();

        assert_eq!(
            table.column_names(),
            [
                "Region",
                "GINI Coefficient for Women - 2022",
                "GINI Coefficient for Men - 2022",
                "GINI Coefficient for Women - 2023",
                "GINI Coefficient for Men - 2023",
                "GINI Coefficient - 2022",
                "GINI Coefficient - 2023",
            ]
        );
        let order = table.rows.iter().map(|row| row.region.as_str()).collect::<Vec<_>>();
        assert_eq!(order, ["TR2", "TR1", "TR3"]);
        assert_eq!(table.value("TR1", 2022, GiniGroup::Overall), Some(0.0));
        assert_eq!(table.value("TR3", 2023, GiniGroup::Overall), None);
    }

    #[test]
    fn test_metric_error_names_year_region_and_group() {
        let households = vec![household(1, "TR4", 1_000.0)];
        let individuals = vec![person(&households[0], Gender::Male, None)];
        let surveys = [survey(2022, households, individuals)];
        let err = RegionGiniTable::compute(&surveys, &regions(&["TR4"]), 14).unwrap_err();
        assert_eq!(err.group, GiniGroup::Men);
        assert_eq!(err.region, "TR4");
        assert_eq!(err.source, GiniError::ZeroTotal);
        assert!(err.to_string().contains("men in region TR4 (2022)"));
    }
}
