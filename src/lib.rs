//! Date-windowed summaries of wide multi-year CSV time series.
//!
//! A wide file carries one `Timestamp.<year>` / `<year>` column pair per year.
//! The [`pipeline`] module answers the two questions asked of such files:
//! "what happened across these files in this window" (reshaped to one long
//! series per file) and "what happened in this year of this file" (one
//! column, gaps interpolated).

pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod pipeline;
pub mod report;
pub mod stats;

pub use data::model::{DateWindow, LongSeries, Observation, WideYearTable, YearSchema};
pub use error::DataError;
pub use pipeline::{summarize, year_view, FileSummary, YearView};
pub use stats::{SeriesStatistics, Summary};
