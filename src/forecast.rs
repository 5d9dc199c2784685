//! Read-only access to a precomputed forecast and its anomaly calendar.
//!
//! Both files are produced elsewhere. Only the columns used here are read,
//! the rest of each row is ignored.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::model::DateWindow;
use crate::error::DataError;

#[derive(Debug, Deserialize)]
struct ForecastRow {
    ds: String,
    yhat: f64,
    yhat_lower: f64,
    yhat_upper: f64,
}

#[derive(Debug, Deserialize)]
struct AnomalyRow {
    ds: String,
    anomaly: String,
}

/// `ds` cells look like `2015-01-04` or `2015-01-04 00:00:00`.
fn parse_ds(ds: &str) -> Option<NaiveDate> {
    let day = ds.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

// ---------------------------------------------------------------------------
// Forecast table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub date: NaiveDate,
    pub yhat: f64,
    pub lower: f64,
    pub upper: f64,
}

impl Prediction {
    pub fn describe(&self) -> String {
        format!(
            "On {} the predicted supply demand is between {:.2} and {:.2}, with a most likely demand of {:.2}.",
            self.date, self.lower, self.upper, self.yhat
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct ForecastTable {
    predictions: BTreeMap<NaiveDate, Prediction>,
}

impl ForecastTable {
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file).with_context(|| format!("reading forecast {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let mut predictions = BTreeMap::new();
        let mut skipped = 0usize;

        for (row_no, result) in reader.deserialize::<ForecastRow>().enumerate() {
            let row = result.with_context(|| format!("forecast line {}", row_no + 2))?;
            let Some(date) = parse_ds(&row.ds) else {
                skipped += 1;
                continue;
            };
            predictions.insert(
                date,
                Prediction {
                    date,
                    yhat: row.yhat,
                    lower: row.yhat_lower,
                    upper: row.yhat_upper,
                },
            );
        }

        if skipped > 0 {
            log::warn!("Skipped {skipped} forecast rows with an unreadable ds");
        }
        Ok(Self { predictions })
    }

    pub fn prediction_for(&self, date: NaiveDate) -> Option<&Prediction> {
        self.predictions.get(&date)
    }

    /// Dates covered by the forecast.
    pub fn span(&self) -> Option<DateWindow> {
        let first = self.predictions.keys().next()?;
        let last = self.predictions.keys().next_back()?;
        Some(DateWindow::new(*first, *last))
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Anomaly calendar
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyEvent {
    pub date: NaiveDate,
    pub message: String,
}

pub fn load_anomalies(path: &Path, window: Option<&DateWindow>) -> Result<Vec<AnomalyEvent>> {
    let file = std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_anomalies(file, window)
}

/// Rows flagged `Yes`, in date order, optionally restricted to `window`.
pub fn read_anomalies<R: Read>(
    reader: R,
    window: Option<&DateWindow>,
) -> Result<Vec<AnomalyEvent>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut events = Vec::new();

    for (row_no, result) in reader.deserialize::<AnomalyRow>().enumerate() {
        let line = row_no + 2;
        let row = result.with_context(|| format!("anomaly line {line}"))?;
        if !row.anomaly.trim().eq_ignore_ascii_case("yes") {
            continue;
        }
        let Some(date) = parse_ds(&row.ds) else {
            log::warn!("anomaly line {line}: unreadable ds '{}'", row.ds);
            continue;
        };
        if window.is_some_and(|w| !w.contains(date)) {
            continue;
        }
        events.push(AnomalyEvent {
            date,
            message: format!(
                "On {date}, it is expected to experience an anomaly in supply demand."
            ),
        });
    }

    events.sort_by_key(|e| e.date);
    Ok(events)
}
