use chrono::NaiveDate;
use serde::Serialize;

use super::model::{DateWindow, LongSeries, WideYearTable};
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Long-format path
// ---------------------------------------------------------------------------

/// Observations of `series` falling inside `window`, in their original order.
///
/// The series is sorted, so the window maps to one contiguous slice.
pub fn filter_series(series: &LongSeries, window: &DateWindow) -> LongSeries {
    if window.is_inverted() {
        return LongSeries::default();
    }
    let obs = series.observations();
    let lo = obs.partition_point(|o| o.timestamp < window.start);
    let hi = obs.partition_point(|o| o.timestamp <= window.end);
    LongSeries::from_observations(obs[lo..hi.max(lo)].to_vec())
}

// ---------------------------------------------------------------------------
// Single-year wide path
// ---------------------------------------------------------------------------

/// Rows of one year's column pair that fall inside a window.
///
/// Values are still optional here; gap filling happens afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct YearSlice {
    pub year: u16,
    pub timestamps: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
}

impl YearSlice {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Select the rows of `year` whose timestamp lies in `window`, keeping file
/// order. Rows with a missing or unparsable timestamp never match.
pub fn filter_year(
    table: &WideYearTable,
    year: u16,
    window: &DateWindow,
) -> Result<YearSlice, DataError> {
    let column = table.year(year)?;
    let mut slice = YearSlice {
        year,
        ..Default::default()
    };

    for (ts, value) in column.timestamps.iter().zip(&column.values) {
        let Some(date) = ts.as_deref().and_then(|t| table.parse_timestamp(t)) else {
            continue;
        };
        if window.contains(date) {
            slice.timestamps.push(date);
            slice.values.push(*value);
        }
    }

    log::debug!("Year {year}: {} rows inside {window}", slice.len());
    Ok(slice)
}
