use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::model::{DateWindow, YearSchema, DEFAULT_DATE_FORMAT, DEFAULT_YEARS};
use crate::error::DataError;

/// Settings read from an optional JSON file. Every field has a default, so a
/// file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory scanned for candidate `.csv` datasets.
    pub data_dir: PathBuf,
    /// Years every dataset must declare as `Timestamp.<year>` / `<year>`.
    pub years: Vec<u16>,
    /// `chrono` format of the timestamp cells.
    pub date_format: String,
    /// Initial window for multi-file comparisons.
    pub compare_window: DateWindow,
    /// Initial window and year for the single-year view.
    pub year_window: DateWindow,
    pub default_year: u16,
    pub forecast_path: PathBuf,
    pub anomaly_path: PathBuf,
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            years: DEFAULT_YEARS.to_vec(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            compare_window: DateWindow::new(ymd(2011, 1, 18), ymd(2011, 1, 25)),
            year_window: DateWindow::new(ymd(2011, 4, 1), ymd(2011, 5, 30)),
            default_year: 2011,
            forecast_path: PathBuf::from("model/forecast.csv"),
            anomaly_path: PathBuf::from("model/anomaly.csv"),
        }
    }
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| DataError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// `load` when a path is given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn schema(&self) -> YearSchema {
        YearSchema::new(self.years.iter().copied()).with_date_format(&self.date_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mqh.json");
        std::fs::write(
            &path,
            r#"{ "years": [2013], "compare_window": { "start": "2013-02-01", "end": "2013-03-01" } }"#,
        )
        .unwrap();

        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.years, vec![2013]);
        assert_eq!(config.compare_window.start, ymd(2013, 2, 1));
        assert_eq!(config.date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(config.default_year, 2011);
        assert_eq!(config.schema().years().collect::<Vec<_>>(), vec![2013]);
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ years: ").unwrap();
        let err = DashboardConfig::load(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::Config { path: p, .. }) if p == &path
        ));
        assert!(format!("{err:#}").contains("parsing config"));
    }

    #[test]
    fn absent_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DashboardConfig::load(&dir.path().join("none.json")).unwrap_err();
        assert!(matches!(err.downcast_ref::<DataError>(), Some(DataError::Io { .. })));
    }

    #[test]
    fn no_path_means_defaults() {
        let config = DashboardConfig::load_or_default(None).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }
}
