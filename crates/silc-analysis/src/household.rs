//! Household derivation
//!
//! Each household row is combined with its members to obtain the family
//! composition, the OECD-modified equivalence scale and the average years of
//! education. Members are the personal register rows that carry the family
//! id; lookups go through `BTreeMap`s so the row order of the input files is
//! irrelevant.

use std::collections::BTreeMap;

use tracing::warn;

use crate::{
    config::PipelineConfig,
    load::RawSurveyYear,
    record::{Household, PersonalRecordRow, PersonalRow},
};

/// Adult and child counts of one family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Composition {
    pub adults: usize,
    pub children: usize,
}

impl Composition {
    #[must_use]
    pub fn members(self) -> usize {
        self.adults + self.children
    }
}

/// Counts adults (older than `adult_age_threshold`) and children per family.
///
/// Members with an unknown age are counted in neither group.
#[must_use]
pub fn compositions(
    records: &[PersonalRecordRow],
    adult_age_threshold: u32,
) -> BTreeMap<u64, Composition> {
    let mut compositions = BTreeMap::<u64, Composition>::new();
    for record in records {
        let composition = compositions.entry(record.family).or_default();
        match record.age {
            Some(age) if age > adult_age_threshold => composition.adults += 1,
            Some(_) => composition.children += 1,
            None => {}
        }
    }
    compositions
}

/// Mean years of education per family over personal rows with a known level.
#[must_use]
#[expect(clippy::cast_precision_loss)]
pub fn average_years_of_education(
    personal: &[PersonalRow],
    config: &PipelineConfig,
) -> BTreeMap<u64, f64> {
    let mut totals = BTreeMap::<u64, (f64, usize)>::new();
    for row in personal {
        if let Some(years) = row.education.and_then(|code| config.years_of_education(code)) {
            let (sum, count) = totals.entry(row.family).or_default();
            *sum += years;
            *count += 1;
        }
    }
    totals
        .into_iter()
        .map(|(family, (sum, count))| (family, sum / count as f64))
        .collect()
}

/// Derives every household of `raw`, keeping the household file order.
///
/// A family without any personal register row gets no equivalence scale, so
/// its scaled fields are missing.
#[must_use]
pub fn derive_households(raw: &RawSurveyYear, config: &PipelineConfig) -> Vec<Household> {
    let compositions = compositions(&raw.personal_records, config.adult_age_threshold);
    let education = average_years_of_education(&raw.personal, config);

    raw.households
        .iter()
        .map(|row| {
            let composition = compositions.get(&row.family).copied();
            if composition.is_none() {
                warn!(family = row.family, "household has no members");
            }
            Household {
                family: row.family,
                region: row.region.clone(),
                weight: row.weight,
                income: row.income,
                transfers: row.transfers,
                average_years_of_education: education.get(&row.family).copied(),
                adults: composition.map_or(0, |c| c.adults),
                children: composition.map_or(0, |c| c.children),
                equivalence_scale: composition
                    .map(|c| config.equivalence_scale.factor(c.adults, c.children)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Gender, HouseholdRow};

    fn record(family: u64, individual: u64, age: Option<u32>) -> PersonalRecordRow {
        PersonalRecordRow {
            family,
            individual,
            weight: None,
            age,
            gender: Gender::Unspecified,
        }
    }

    fn personal(family: u64, individual: u64, education: Option<u32>) -> PersonalRow {
        PersonalRow {
            family,
            individual,
            education,
            place_of_work: None,
            income: None,
        }
    }

    fn household_row(family: u64, income: f64) -> HouseholdRow {
        HouseholdRow {
            family,
            region: Some("TR1".to_owned()),
            weight: Some(1.0),
            income: Some(income),
            transfers: 0.0,
        }
    }

    #[test]
    fn test_compositions_use_strict_adult_threshold() {
        let records = [
            record(7, 2, Some(15)),
            record(3, 1, Some(40)),
            record(7, 1, Some(14)),
            record(7, 3, None),
            record(3, 2, Some(2)),
        ];
        let compositions = compositions(&records, 14);
        assert_eq!(
            compositions[&7],
            Composition {
                adults: 1,
                children: 1
            }
        );
        assert_eq!(compositions[&3].members(), 2);
    }

    #[test]
    fn test_average_years_of_education_skips_unknown_levels() {
        let config = PipelineConfig::default();
        let rows = [
            personal(1, 1, Some(3)),
            personal(1, 2, Some(8)),
            personal(1, 3, Some(42)),
            personal(1, 4, None),
            personal(2, 1, None),
        ];
        let averages = average_years_of_education(&rows, &config);
        assert_eq!(averages.get(&1), Some(&9.75));
        assert_eq!(averages.get(&2), None);
    }

    #[test]
    fn test_two_adults_and_a_child() {
        let config = PipelineConfig::default();
        let raw = RawSurveyYear {
            households: vec![household_row(1, 54_000.0), household_row(2, 10_000.0)],
            personal_records: vec![
                record(1, 1, Some(41)),
                record(1, 2, Some(39)),
                record(1, 3, Some(8)),
            ],
            personal: vec![],
        };
        let households = derive_households(&raw, &config);
        let family = &households[0];
        assert_eq!((family.adults, family.children), (2, 1));
        assert!((family.equivalence_scale.unwrap() - 1.8).abs() < 1e-12);
        assert!((family.scaled_income().unwrap() - 30_000.0).abs() < 1e-9);

        let empty = &households[1];
        assert_eq!(empty.equivalence_scale, None);
        assert_eq!(empty.scaled_income(), None);
    }
}
