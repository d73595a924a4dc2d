//! Delimited survey tables
//!
//! A [`DelimitedTable`] is a header row plus string records read with the
//! `csv` crate. Typed accessors parse cells on demand: an empty cell is a
//! missing value (`None`), anything else must parse or the load fails with
//! the table, column and row that could not be read.

use std::{
    fs::File,
    io::{self, BufReader},
    path::Path,
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadError {
    #[display("failed to open {table}: {source}")]
    Open { table: String, source: io::Error },
    #[display("failed to read {table}: {source}")]
    Csv { table: String, source: csv::Error },
    #[display("column '{column}' is missing from {table}")]
    MissingColumn { table: String, column: String },
    #[display("{table}: row {row}, column '{column}' has no value")]
    MissingValue {
        table: String,
        column: String,
        row: usize,
    },
    #[display("{table}: row {row}, column '{column}' has invalid value '{value}'")]
    InvalidValue {
        table: String,
        column: String,
        row: usize,
        value: String,
    },
}

/// Position of a named column in a [`DelimitedTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    name: String,
    index: usize,
}

impl ColumnRef {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A delimited file loaded into memory.
#[derive(Debug, Clone)]
pub struct DelimitedTable {
    name: String,
    headers: csv::StringRecord,
    records: Vec<csv::StringRecord>,
}

impl DelimitedTable {
    /// Reads a delimited file with a header row.
    pub fn read<P>(path: P, delimiter: u8) -> Result<Self, LoadError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let name = path.display().to_string();
        let file = File::open(path).map_err(|source| LoadError::Open {
            table: name.clone(),
            source,
        })?;
        Self::from_reader(name, BufReader::new(file), delimiter)
    }

    /// Reads delimited data from any reader; `name` identifies the table in errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use silc_analysis::table::DelimitedTable;
    ///
    /// let data = "BULTEN;HG110\n1;1500.5\n2;\n";
    /// let table = DelimitedTable::from_reader("households", data.as_bytes(), b';').unwrap();
    /// let income = table.column("HG110").unwrap();
    /// assert_eq!(table.f64_at(0, &income).unwrap(), Some(1500.5));
    /// assert_eq!(table.f64_at(1, &income).unwrap(), None);
    /// ```
    pub fn from_reader<R>(
        name: impl Into<String>,
        reader: R,
        delimiter: u8,
    ) -> Result<Self, LoadError>
    where
        R: io::Read,
    {
        let name = name.into();
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let csv_error = |source| LoadError::Csv {
            table: name.clone(),
            source,
        };

        let headers = reader.headers().map_err(csv_error)?.clone();
        let records = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(csv_error)?;

        Ok(Self {
            name,
            headers,
            records,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a column by its header name.
    pub fn column(&self, name: &str) -> Result<ColumnRef, LoadError> {
        self.headers
            .iter()
            .position(|header| header == name)
            .map(|index| ColumnRef {
                name: name.to_owned(),
                index,
            })
            .ok_or_else(|| LoadError::MissingColumn {
                table: self.name.clone(),
                column: name.to_owned(),
            })
    }

    /// Raw cell content, `None` when the cell is empty.
    #[must_use]
    pub fn str_at(&self, row: usize, column: &ColumnRef) -> Option<&str> {
        self.records[row]
            .get(column.index)
            .filter(|value| !value.is_empty())
    }

    pub fn f64_at(&self, row: usize, column: &ColumnRef) -> Result<Option<f64>, LoadError> {
        self.str_at(row, column)
            .map(|value| {
                value
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| self.invalid_value(row, column, value))
            })
            .transpose()
    }

    /// Parses an integer code; integral floats such as `9292.0` are accepted.
    pub fn u64_at(&self, row: usize, column: &ColumnRef) -> Result<Option<u64>, LoadError> {
        self.str_at(row, column)
            .map(|value| parse_integer(value).ok_or_else(|| self.invalid_value(row, column, value)))
            .transpose()
    }

    pub fn u32_at(&self, row: usize, column: &ColumnRef) -> Result<Option<u32>, LoadError> {
        self.u64_at(row, column)?
            .map(|value| {
                u32::try_from(value).map_err(|_| self.invalid_value(row, column, &value.to_string()))
            })
            .transpose()
    }

    /// Like [`Self::u64_at`] but a missing cell is an error.
    pub fn required_u64(&self, row: usize, column: &ColumnRef) -> Result<u64, LoadError> {
        self.u64_at(row, column)?
            .ok_or_else(|| self.missing_value(row, column))
    }

    /// Like [`Self::str_at`] but a missing cell is an error.
    pub fn required_str(&self, row: usize, column: &ColumnRef) -> Result<&str, LoadError> {
        self.str_at(row, column)
            .ok_or_else(|| self.missing_value(row, column))
    }

    fn missing_value(&self, row: usize, column: &ColumnRef) -> LoadError {
        LoadError::MissingValue {
            table: self.name.clone(),
            column: column.name.clone(),
            // Header is line 1
            row: row + 2,
        }
    }

    fn invalid_value(&self, row: usize, column: &ColumnRef, value: &str) -> LoadError {
        LoadError::InvalidValue {
            table: self.name.clone(),
            column: column.name.clone(),
            row: row + 2,
            value: value.to_owned(),
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]
fn parse_integer(value: &str) -> Option<u64> {
    if let Ok(n) = value.parse::<u64>() {
        return Some(n);
    }
    let float = value.parse::<f64>().ok()?;
    (float.is_finite() && float >= 0.0 && float.fract() == 0.0 && float <= u64::MAX as f64)
        .then_some(float as u64)
}
