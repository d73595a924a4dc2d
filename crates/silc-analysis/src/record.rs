//! Canonical survey records
//!
//! Raw survey columns are projected onto the typed rows of this module. Every
//! numeric field that may be blank in the microdata is an `Option`; only the
//! family and individual identifiers are required.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    config::{ColumnNames, GenderCodes},
    table::{DelimitedTable, LoadError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    /// A code that is neither the configured male nor female code.
    Other(u32),
    Unspecified,
}

impl Gender {
    #[must_use]
    pub fn from_code(code: Option<u32>, codes: GenderCodes) -> Self {
        match code {
            Some(code) if code == codes.male => Self::Male,
            Some(code) if code == codes.female => Self::Female,
            Some(code) => Self::Other(code),
            None => Self::Unspecified,
        }
    }
}

/// One row of the household file.
#[derive(Debug, Clone, PartialEq)]
pub struct HouseholdRow {
    pub family: u64,
    pub region: Option<String>,
    pub weight: Option<f64>,
    pub income: Option<f64>,
    /// Sum of the transfer components; blank components count as zero.
    pub transfers: f64,
}

impl HouseholdRow {
    pub fn from_table(table: &DelimitedTable, columns: &ColumnNames) -> Result<Vec<Self>, LoadError> {
        let family = table.column(&columns.family)?;
        let region = table.column(&columns.region)?;
        let weight = table.column(&columns.household_weight)?;
        let income = table.column(&columns.household_income)?;
        let transfers = columns
            .transfers
            .iter()
            .map(|name| table.column(name))
            .collect::<Result<Vec<_>, _>>()?;

        (0..table.len())
            .map(|row| {
                let mut transfer_sum = 0.0;
                for column in &transfers {
                    transfer_sum += table.f64_at(row, column)?.unwrap_or(0.0);
                }
                Ok(Self {
                    family: table.required_u64(row, &family)?,
                    region: table.str_at(row, &region).map(str::to_owned),
                    weight: table.f64_at(row, &weight)?,
                    income: table.f64_at(row, &income)?,
                    transfers: transfer_sum,
                })
            })
            .collect()
    }
}

/// One row of the personal register file.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonalRecordRow {
    pub family: u64,
    pub individual: u64,
    pub weight: Option<f64>,
    pub age: Option<u32>,
    pub gender: Gender,
}

impl PersonalRecordRow {
    pub fn from_table(
        table: &DelimitedTable,
        columns: &ColumnNames,
        gender_codes: GenderCodes,
    ) -> Result<Vec<Self>, LoadError> {
        let family = table.column(&columns.family)?;
        let individual = table.column(&columns.individual)?;
        let weight = table.column(&columns.record_weight)?;
        let age = table.column(&columns.age)?;
        let gender = table.column(&columns.gender)?;

        (0..table.len())
            .map(|row| {
                Ok(Self {
                    family: table.required_u64(row, &family)?,
                    individual: table.required_u64(row, &individual)?,
                    weight: table.f64_at(row, &weight)?,
                    age: table.u32_at(row, &age)?,
                    gender: Gender::from_code(table.u32_at(row, &gender)?, gender_codes),
                })
            })
            .collect()
    }
}

/// One row of the personal file.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonalRow {
    pub family: u64,
    pub individual: u64,
    pub education: Option<u32>,
    pub place_of_work: Option<u32>,
    pub income: Option<f64>,
}

impl PersonalRow {
    pub fn from_table(table: &DelimitedTable, columns: &ColumnNames) -> Result<Vec<Self>, LoadError> {
        let family = table.column(&columns.family)?;
        let individual = table.column(&columns.individual)?;
        let education = table.column(&columns.education)?;
        let place_of_work = table.column(&columns.place_of_work)?;
        let income = table.column(&columns.personal_income)?;

        (0..table.len())
            .map(|row| {
                Ok(Self {
                    family: table.required_u64(row, &family)?,
                    individual: table.required_u64(row, &individual)?,
                    education: table.u32_at(row, &education)?,
                    place_of_work: table.u32_at(row, &place_of_work)?,
                    income: table.f64_at(row, &income)?,
                })
            })
            .collect()
    }
}

/// A household with its derived composition and income fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Household {
    pub family: u64,
    pub region: Option<String>,
    pub weight: Option<f64>,
    pub income: Option<f64>,
    pub transfers: f64,
    /// Mean years of education over the family's personal rows with a known level.
    pub average_years_of_education: Option<f64>,
    /// Members above the adult age threshold.
    pub adults: usize,
    /// Members at or below the adult age threshold.
    pub children: usize,
    /// `None` when no personal record belongs to the family.
    pub equivalence_scale: Option<f64>,
}

impl Household {
    #[must_use]
    pub fn income_without_transfers(&self) -> Option<f64> {
        self.income.map(|income| income - self.transfers)
    }

    #[must_use]
    pub fn scaled_income(&self) -> Option<f64> {
        Some(self.income? / self.equivalence_scale?)
    }

    #[must_use]
    pub fn scaled_income_without_transfers(&self) -> Option<f64> {
        Some(self.income_without_transfers()? / self.equivalence_scale?)
    }

    #[must_use]
    pub fn scaled_transfers(&self) -> Option<f64> {
        Some(self.transfers / self.equivalence_scale?)
    }
}

/// A person joined with their personal row and household.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    pub family: u64,
    pub individual: u64,
    pub record_weight: Option<f64>,
    pub age: Option<u32>,
    pub gender: Gender,
    pub education: Option<u32>,
    pub years_of_education: Option<f64>,
    pub place_of_work: Option<u32>,
    pub income: Option<f64>,
    pub household: Option<Household>,
}

impl Individual {
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.household.as_ref()?.region.as_deref()
    }

    /// Whether the individual is older than `threshold`; unknown ages are not.
    #[must_use]
    pub fn is_older_than(&self, threshold: u32) -> bool {
        self.age.is_some_and(|age| age > threshold)
    }
}

/// Household-level income fields that can be summarised or plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncomeField {
    ScaledIncome,
    ScaledIncomeWithoutTransfers,
    Income,
    IncomeWithoutTransfers,
    Transfers,
    ScaledTransfers,
    EquivalenceScale,
}

impl IncomeField {
    pub const ALL: [Self; 7] = [
        Self::ScaledIncome,
        Self::ScaledIncomeWithoutTransfers,
        Self::Income,
        Self::IncomeWithoutTransfers,
        Self::Transfers,
        Self::ScaledTransfers,
        Self::EquivalenceScale,
    ];

    /// Identifier accepted on the command line.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::ScaledIncome => "scaled-income",
            Self::ScaledIncomeWithoutTransfers => "scaled-income-without-transfers",
            Self::Income => "income",
            Self::IncomeWithoutTransfers => "income-without-transfers",
            Self::Transfers => "transfers",
            Self::ScaledTransfers => "scaled-transfers",
            Self::EquivalenceScale => "equivalence-scale",
        }
    }

    /// Column header used in exported tables and report labels.
    #[must_use]
    pub fn column_name(self) -> &'static str {
        match self {
            Self::ScaledIncome => "Scaled Household Income",
            Self::ScaledIncomeWithoutTransfers => "Scaled Household Income Without Transfers",
            Self::Income => "Household Income",
            Self::IncomeWithoutTransfers => "Household Income Without Transfers",
            Self::Transfers => "Transfers",
            Self::ScaledTransfers => "Scaled Transfers",
            Self::EquivalenceScale => "Family EFB",
        }
    }

    #[must_use]
    pub fn value(self, household: &Household) -> Option<f64> {
        match self {
            Self::ScaledIncome => household.scaled_income(),
            Self::ScaledIncomeWithoutTransfers => household.scaled_income_without_transfers(),
            Self::Income => household.income,
            Self::IncomeWithoutTransfers => household.income_without_transfers(),
            Self::Transfers => Some(household.transfers),
            Self::ScaledTransfers => household.scaled_transfers(),
            Self::EquivalenceScale => household.equivalence_scale,
        }
    }
}

impl fmt::Display for IncomeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown income field '{name}'")]
pub struct UnknownIncomeFieldError {
    pub name: String,
}

impl FromStr for IncomeField {
    type Err = UnknownIncomeFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| UnknownIncomeFieldError { name: s.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn household(income: Option<f64>, transfers: f64, scale: Option<f64>) -> Household {
        Household {
            family: 1,
            region: Some("TR1".to_owned()),
            weight: Some(1.0),
            income,
            transfers,
            average_years_of_education: None,
            adults: 2,
            children: 1,
            equivalence_scale: scale,
        }
    }

    #[test]
    fn test_household_rows_sum_transfers() {
        let data = "\
BULTEN;HB031;HB040;HG110;HG030N;HG030A;HG040;HG050N;HG050A;HG060N;HG060A
1;TR1;100.5;50000;100;;200;0;0;50;
2;;80;;;;;;;;
";
        let table = DelimitedTable::from_reader("gyk22_h.csv", data.as_bytes(), b';').unwrap();
        let rows = HouseholdRow::from_table(&table, &ColumnNames::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].region.as_deref(), Some("TR1"));
        assert_eq!(rows[0].income, Some(50_000.0));
        assert_eq!(rows[0].transfers, 350.0);
        assert_eq!(rows[1].region, None);
        assert_eq!(rows[1].income, None);
        assert_eq!(rows[1].transfers, 0.0);
    }

    #[test]
    fn test_missing_transfer_column_is_fatal() {
        let data = "BULTEN,HB031,HB040,HG110\n1,TR1,1,1\n";
        let table = DelimitedTable::from_reader("gyk23_h.csv", data.as_bytes(), b',').unwrap();
        let err = HouseholdRow::from_table(&table, &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { ref column, .. } if column == "HG030N"));
    }

    #[test]
    fn test_personal_record_genders() {
        let data = "BULTEN,FERT_ID,FK050,FK070,FK090\n1,1,1.5,40,1\n1,2,1.5,38,2\n1,3,,3,\n";
        let table = DelimitedTable::from_reader("gyk23_fk.csv", data.as_bytes(), b',').unwrap();
        let rows =
            PersonalRecordRow::from_table(&table, &ColumnNames::default(), GenderCodes::default())
                .unwrap();
        let genders = rows.iter().map(|row| row.gender).collect::<Vec<_>>();
        assert_eq!(genders, [Gender::Male, Gender::Female, Gender::Unspecified]);
        assert_eq!(rows[2].weight, None);
        assert_eq!(Gender::from_code(Some(9), GenderCodes::default()), Gender::Other(9));
    }

    #[test]
    fn test_scaled_income_times_scale_is_income() {
        let household = household(Some(54_000.0), 6_000.0, Some(1.8));
        let scaled = household.scaled_income().unwrap();
        assert!((scaled * 1.8 - 54_000.0).abs() < 1e-9);
        assert_eq!(household.income_without_transfers(), Some(48_000.0));
        assert!((household.scaled_transfers().unwrap() * 1.8 - 6_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_derived_fields_propagate_missing_values() {
        let no_income = household(None, 100.0, Some(1.5));
        assert_eq!(no_income.scaled_income(), None);
        assert_eq!(no_income.income_without_transfers(), None);
        assert_eq!(no_income.scaled_transfers().map(f64::round), Some(67.0));

        let no_members = household(Some(10.0), 0.0, None);
        assert_eq!(no_members.scaled_income(), None);
        assert_eq!(IncomeField::Income.value(&no_members), Some(10.0));
        assert_eq!(IncomeField::EquivalenceScale.value(&no_members), None);
    }

    #[test]
    fn test_income_field_keys() {
        for field in IncomeField::ALL {
            assert_eq!(field.key().parse::<IncomeField>().unwrap(), field);
            assert_eq!(field.to_string(), field.key());
        }
        assert!("scaled_income".parse::<IncomeField>().is_err());
    }
}
