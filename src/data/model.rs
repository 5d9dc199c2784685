use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Day-month-year layout used by the timestamp columns of the wide files.
pub const DEFAULT_DATE_FORMAT: &str = "%d-%m-%Y";

/// Years present in the datasets this tool was built around.
pub const DEFAULT_YEARS: [u16; 4] = [2011, 2012, 2013, 2014];

// ---------------------------------------------------------------------------
// YearSchema – the declared column layout of a wide file
// ---------------------------------------------------------------------------

/// Header names holding one year's timestamps and values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearColumns {
    pub timestamp: String,
    pub value: String,
}

impl YearColumns {
    /// The conventional `Timestamp.<year>` / `<year>` pair.
    pub fn for_year(year: u16) -> Self {
        Self {
            timestamp: format!("Timestamp.{year}"),
            value: year.to_string(),
        }
    }
}

/// Which years a wide file must carry, and under which headers.
///
/// Every declared year is required: loading a file whose header lacks one of
/// the declared columns fails with [`DataError::Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSchema {
    years: BTreeMap<u16, YearColumns>,
    date_format: String,
}

impl YearSchema {
    /// Schema with the conventional column names for each year.
    pub fn new(years: impl IntoIterator<Item = u16>) -> Self {
        Self {
            years: years
                .into_iter()
                .map(|y| (y, YearColumns::for_year(y)))
                .collect(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    /// Override the column names used for one year.
    pub fn with_columns(mut self, year: u16, timestamp: &str, value: &str) -> Self {
        self.years.insert(
            year,
            YearColumns {
                timestamp: timestamp.to_string(),
                value: value.to_string(),
            },
        );
        self
    }

    /// Override the `chrono` format used to parse timestamp cells.
    pub fn with_date_format(mut self, format: &str) -> Self {
        self.date_format = format.to_string();
        self
    }

    pub fn years(&self) -> impl Iterator<Item = u16> + '_ {
        self.years.keys().copied()
    }

    pub fn columns(&self) -> impl Iterator<Item = (u16, &YearColumns)> + '_ {
        self.years.iter().map(|(y, c)| (*y, c))
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }
}

impl Default for YearSchema {
    fn default() -> Self {
        Self::new(DEFAULT_YEARS)
    }
}

// ---------------------------------------------------------------------------
// WideYearTable – the file as loaded
// ---------------------------------------------------------------------------

/// One year's column pair. Both vectors have one entry per file row.
///
/// Timestamps stay textual until they are used so that unparsable cells can be
/// counted where they are dropped. Values are already coerced: `NA`, empty and
/// any other non-numeric text is `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearColumn {
    pub timestamps: Vec<Option<String>>,
    pub values: Vec<Option<f64>>,
}

/// A wide multi-year table: for every declared year, an independent
/// timestamp/value column pair over the same implicit row index.
#[derive(Debug, Clone, PartialEq)]
pub struct WideYearTable {
    pub row_count: usize,
    pub years: BTreeMap<u16, YearColumn>,
    pub date_format: String,
}

impl WideYearTable {
    /// Look up a declared year's columns.
    pub fn year(&self, year: u16) -> Result<&YearColumn, DataError> {
        self.years.get(&year).ok_or(DataError::UnknownYear { year })
    }

    /// Parse a timestamp cell with this table's date format.
    pub fn parse_timestamp(&self, text: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(text.trim(), &self.date_format).ok()
    }
}

// ---------------------------------------------------------------------------
// LongSeries – reshaped (Timestamp, Value) observations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    pub timestamp: NaiveDate,
    pub value: f64,
}

/// Observations sorted ascending by timestamp, no missing cells.
///
/// The sort is stable, so observations sharing a date keep the order in which
/// they were produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LongSeries {
    observations: Vec<Observation>,
}

impl LongSeries {
    pub fn from_observations(mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|o| o.timestamp);
        Self { observations }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.observations.iter().map(|o| Some(o.value)).collect()
    }

    /// First and last timestamp, if any.
    pub fn span(&self) -> Option<DateWindow> {
        let first = self.observations.first()?;
        let last = self.observations.last()?;
        Some(DateWindow::new(first.timestamp, last.timestamp))
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

// ---------------------------------------------------------------------------
// DateWindow
// ---------------------------------------------------------------------------

/// Inclusive `[start, end]` date range. A window with `start > end` is legal
/// and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

/// Parse a date typed by a user: ISO `YYYY-MM-DD` or the files' `DD-MM-YYYY`.
pub fn parse_user_date(input: &str) -> Result<NaiveDate, DataError> {
    let s = input.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, DEFAULT_DATE_FORMAT))
        .map_err(|_| DataError::InvalidDate {
            input: input.to_string(),
        })
}
