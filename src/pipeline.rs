//! Request-level entry points: one call answers one user interaction.
//!
//! Nothing here keeps state between calls. Every function reads its inputs,
//! runs load → reshape/select → filter → (interpolate) → summarize and hands
//! back plain values for whoever renders them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use crate::data::filter::{filter_series, filter_year};
use crate::data::interpolate::interpolate_linear;
use crate::data::loader::load_table;
use crate::data::model::{DateWindow, LongSeries, WideYearTable, YearSchema};
use crate::data::reshape::reshape;
use crate::stats::Summary;

// ---------------------------------------------------------------------------
// Multi-file comparison (long format)
// ---------------------------------------------------------------------------

/// One file's contribution to a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSummary {
    pub path: PathBuf,
    /// Full date span of the reshaped file, before windowing.
    pub available: Option<DateWindow>,
    /// Observations inside the requested window.
    pub series: LongSeries,
    pub summary: Summary,
}

/// Reshape, window and summarize each file in the order given.
///
/// A file that cannot be read or does not match `schema` aborts the whole
/// request; an empty window does not, it yields [`Summary::NoData`].
pub fn summarize(
    files: &[PathBuf],
    schema: &YearSchema,
    window: &DateWindow,
) -> Result<Vec<FileSummary>> {
    files
        .iter()
        .map(|path| {
            let table = load_table(path, schema)
                .with_context(|| format!("summarizing {}", path.display()))?;
            Ok(summarize_table(path, &table, window))
        })
        .collect()
}

/// Summarize an already loaded table.
pub fn summarize_table(path: &Path, table: &WideYearTable, window: &DateWindow) -> FileSummary {
    let full = reshape(table);
    let series = filter_series(&full, window);
    let summary = Summary::of(&series.values());

    if series.is_empty() {
        log::info!("{}: no observations in {window}", path.display());
    }

    FileSummary {
        path: path.to_path_buf(),
        available: full.span(),
        series,
        summary,
    }
}

/// Smallest window covering every non-empty span.
pub fn combined_span<'a>(spans: impl IntoIterator<Item = &'a DateWindow>) -> Option<DateWindow> {
    spans.into_iter().fold(None, |acc, w| {
        Some(match acc {
            None => *w,
            Some(a) => DateWindow::new(a.start.min(w.start), a.end.max(w.end)),
        })
    })
}

// ---------------------------------------------------------------------------
// Single-year view (wide format, interpolated)
// ---------------------------------------------------------------------------

/// One year's column from one file, windowed and gap-filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearView {
    pub path: PathBuf,
    pub year: u16,
    pub timestamps: Vec<NaiveDate>,
    /// Values after interpolation; edges without a known neighbour stay `None`.
    pub values: Vec<Option<f64>>,
    pub summary: Summary,
}

/// A window whose rows all lack a value yields [`Summary::Undefined`] with the
/// rows kept, so callers can still list the dates.
pub fn year_view(
    path: &Path,
    schema: &YearSchema,
    year: u16,
    window: &DateWindow,
) -> Result<YearView> {
    let table = load_table(path, schema)?;
    year_view_of_table(path, &table, year, window)
}

pub fn year_view_of_table(
    path: &Path,
    table: &WideYearTable,
    year: u16,
    window: &DateWindow,
) -> Result<YearView> {
    let slice = filter_year(table, year, window)
        .with_context(|| format!("selecting year {year} of {}", path.display()))?;
    let values = interpolate_linear(&slice.values);
    let summary = Summary::of(&values);

    Ok(YearView {
        path: path.to_path_buf(),
        year,
        timestamps: slice.timestamps,
        values,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn combined_span_covers_all() {
        let a = DateWindow::new(d(2011, 1, 5), d(2011, 3, 1));
        let b = DateWindow::new(d(2010, 12, 1), d(2011, 2, 1));
        assert_eq!(
            combined_span([&a, &b]),
            Some(DateWindow::new(d(2010, 12, 1), d(2011, 3, 1)))
        );
        assert_eq!(combined_span(std::iter::empty()), None);
    }
}
