//! Joined survey years
//!
//! A [`SurveyYear`] holds the derived households and the individuals of one
//! year after the joins and outlier exclusion:
//!
//! 1. personal register rows LEFT JOIN personal rows on `(family, individual)`
//! 2. the result LEFT JOIN households on `family`
//! 3. configured outlier families are dropped from both sets
//!
//! The gender partitions used by the Gini table are produced on demand by
//! [`SurveyYear::working_age`] as cleaned copies; the stored individuals are
//! never modified.

use std::collections::{BTreeMap, BTreeSet};

use silc_metrics::distribution::{DistributionError, IncomeDistribution};
use tracing::{debug, info, warn};

use crate::{
    config::{PipelineConfig, SurveyYearConfig},
    household,
    load::RawSurveyYear,
    record::{Gender, Household, IncomeField, Individual, PersonalRow},
};

#[derive(Debug, Clone, PartialEq)]
pub struct SurveyYear {
    pub label: String,
    pub year: i32,
    pub households: Vec<Household>,
    pub individuals: Vec<Individual>,
}

impl SurveyYear {
    /// Derives households, joins individuals and drops excluded families.
    #[must_use]
    pub fn build(raw: &RawSurveyYear, year: &SurveyYearConfig, config: &PipelineConfig) -> Self {
        let excluded = year
            .excluded_families
            .iter()
            .copied()
            .collect::<BTreeSet<_>>();

        let households = household::derive_households(raw, config);
        let household_index = households
            .iter()
            .map(|household| (household.family, household))
            .collect::<BTreeMap<_, _>>();
        let personal_index = raw
            .personal
            .iter()
            .map(|row| ((row.family, row.individual), row))
            .collect::<BTreeMap<_, _>>();

        let individuals = raw
            .personal_records
            .iter()
            .filter(|record| !excluded.contains(&record.family))
            .map(|record| {
                let personal: Option<&PersonalRow> = personal_index
                    .get(&(record.family, record.individual))
                    .copied();
                let education = personal.and_then(|row| row.education);
                Individual {
                    family: record.family,
                    individual: record.individual,
                    record_weight: record.weight,
                    age: record.age,
                    gender: record.gender,
                    education,
                    years_of_education: education.and_then(|code| config.years_of_education(code)),
                    place_of_work: personal.and_then(|row| row.place_of_work),
                    income: personal.and_then(|row| row.income),
                    household: household_index.get(&record.family).map(|h| (*h).clone()),
                }
            })
            .collect::<Vec<_>>();

        let household_count = households.len();
        let households = households
            .into_iter()
            .filter(|household| !excluded.contains(&household.family))
            .collect::<Vec<_>>();
        let dropped = household_count - households.len();
        if dropped > 0 {
            info!(year = year.year, households = dropped, "excluded outlier families");
        }
        let without_region = households.iter().filter(|h| h.region.is_none()).count();
        if without_region > 0 {
            warn!(year = year.year, households = without_region, "households without region");
        }
        debug!(
            year = year.year,
            households = households.len(),
            individuals = individuals.len(),
            "built survey year"
        );

        Self {
            label: year.label.clone(),
            year: year.year,
            households,
            individuals,
        }
    }

    /// Individuals of `gender` older than `threshold`, with missing incomes
    /// set to zero and negative incomes floored at zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use silc_analysis::record::{Gender, Individual};
    /// use silc_analysis::survey::SurveyYear;
    ///
    /// let person = |age, income| Individual {
    ///     family: 1,
    ///     individual: 1,
    ///     record_weight: None,
    ///     age: Some(age),
    ///     gender: Gender::Female,
    ///     education: None,
    ///     years_of_education: None,
    ///     place_of_work: None,
    ///     income,
    ///     household: None,
    /// };
    /// let survey = SurveyYear {
    ///     label: "23".to_owned(),
    ///     year: 2023,
    ///     households: vec![],
    ///     individuals: vec![person(30, Some(-50.0)), person(40, None), person(10, Some(5.0))],
    /// };
    ///
    /// let women = survey.working_age(Gender::Female, 14);
    /// let incomes = women.iter().map(|p| p.income).collect::<Vec<_>>();
    /// assert_eq!(incomes, [Some(0.0), Some(0.0)]);
    /// // The survey itself keeps the raw values
    /// assert_eq!(survey.individuals[0].income, Some(-50.0));
    /// ```
    #[must_use]
    pub fn working_age(&self, gender: Gender, threshold: u32) -> Vec<Individual> {
        self.individuals
            .iter()
            .filter(|individual| individual.gender == gender && individual.is_older_than(threshold))
            .map(|individual| Individual {
                income: Some(individual.income.unwrap_or(0.0).max(0.0)),
                ..individual.clone()
            })
            .collect()
    }

    /// Regions present among the households of this year.
    #[must_use]
    pub fn regions(&self) -> BTreeSet<&str> {
        self.households
            .iter()
            .filter_map(|household| household.region.as_deref())
            .collect()
    }

    /// Households of `region`.
    pub fn households_in<'a>(&'a self, region: &'a str) -> impl Iterator<Item = &'a Household> {
        self.households
            .iter()
            .filter(move |household| household.region.as_deref() == Some(region))
    }

    /// The non-missing values of `field` over all households, labelled with the field name.
    pub fn household_distribution(
        &self,
        field: IncomeField,
    ) -> Result<IncomeDistribution, DistributionError> {
        let values = self.households.iter().filter_map(|household| field.value(household));
        Ok(IncomeDistribution::new(values)?
            .with_label(format!("{} - {}", field.column_name(), self.year)))
    }
}
