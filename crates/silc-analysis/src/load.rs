//! Loading the three survey files of a year

use std::path::Path;

use tracing::debug;

use crate::{
    config::{PipelineConfig, SurveyYearConfig},
    record::{HouseholdRow, PersonalRecordRow, PersonalRow},
    table::{DelimitedTable, LoadError},
};

/// Canonical rows of one survey year before any derivation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSurveyYear {
    pub households: Vec<HouseholdRow>,
    pub personal_records: Vec<PersonalRecordRow>,
    pub personal: Vec<PersonalRow>,
}

impl RawSurveyYear {
    /// Reads the household, personal register and personal files of `year`
    /// from `data_dir`.
    pub fn load(
        config: &PipelineConfig,
        year: &SurveyYearConfig,
        data_dir: &Path,
    ) -> Result<Self, LoadError> {
        let delimiter = year.delimiter_byte();
        let read = |file: &Path| {
            let table = DelimitedTable::read(data_dir.join(file), delimiter)?;
            debug!(table = table.name(), rows = table.len(), "read survey table");
            Ok::<_, LoadError>(table)
        };

        let households = HouseholdRow::from_table(&read(&year.household_file)?, &config.columns)?;
        let personal_records = PersonalRecordRow::from_table(
            &read(&year.personal_record_file)?,
            &config.columns,
            config.gender_codes,
        )?;
        let personal = PersonalRow::from_table(&read(&year.personal_file)?, &config.columns)?;

        Ok(Self {
            households,
            personal_records,
            personal,
        })
    }
}
