use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::model::{WideYearTable, YearColumn, YearSchema};
use crate::error::DataError;

/// Cell contents treated as "no value", compared case-insensitively.
const MISSING_MARKERS: &[&str] = &["", "na", "n/a", "#n/a", "nan", "null", "none", "-"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read a wide multi-year CSV file from disk.
///
/// The header must contain every column declared by `schema`; anything else in
/// the file is ignored. Value cells are coerced once, here: empty cells, `NA`
/// and any other non-numeric text become `None`.
pub fn load_table(path: &Path, schema: &YearSchema) -> Result<WideYearTable> {
    let file = std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_table(file, path, schema)
}

/// Same as [`load_table`] over any reader. `origin` only labels errors.
pub fn read_table<R: Read>(
    reader: R,
    origin: &Path,
    schema: &YearSchema,
) -> Result<WideYearTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| DataError::Csv {
            path: origin.to_path_buf(),
            line: 1,
            source,
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    // Resolve every declared year to (timestamp index, value index) up front.
    let mut missing = Vec::new();
    let mut positions = Vec::new();
    for (year, cols) in schema.columns() {
        let ts_idx = headers.iter().position(|h| *h == cols.timestamp);
        let val_idx = headers.iter().position(|h| *h == cols.value);
        match (ts_idx, val_idx) {
            (Some(t), Some(v)) => positions.push((year, t, v)),
            (t, v) => {
                if t.is_none() {
                    missing.push(cols.timestamp.clone());
                }
                if v.is_none() {
                    missing.push(cols.value.clone());
                }
            }
        }
    }
    if !missing.is_empty() {
        return Err(DataError::Schema {
            path: origin.to_path_buf(),
            missing,
        }
        .into());
    }

    let mut years: BTreeMap<u16, YearColumn> = positions
        .iter()
        .map(|(year, _, _)| (*year, YearColumn::default()))
        .collect();

    let mut row_count = 0usize;
    let mut coerced = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        // Data rows start on line 2, below the header.
        let record = result.map_err(|source| DataError::Csv {
            path: origin.to_path_buf(),
            line: row_no as u64 + 2,
            source,
        })?;

        for (year, ts_idx, val_idx) in &positions {
            let column = years.entry(*year).or_default();

            let ts = record.get(*ts_idx).unwrap_or("");
            column.timestamps.push(parse_text(ts));

            let raw = record.get(*val_idx).unwrap_or("");
            let value = parse_value(raw);
            if value.is_none() && !is_missing(raw) {
                coerced += 1;
            }
            column.values.push(value);
        }
        row_count += 1;
    }

    log::debug!(
        "Loaded {} rows × {} years from {}",
        row_count,
        positions.len(),
        origin.display()
    );
    if coerced > 0 {
        log::debug!("{coerced} non-numeric value cells treated as missing in {}", origin.display());
    }

    Ok(WideYearTable {
        row_count,
        years,
        date_format: schema.date_format().to_string(),
    })
}

/// List the `.csv` files directly inside `dir`, sorted by name.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("listing {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.context("reading directory entry")?.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

// ---------------------------------------------------------------------------
// Cell coercion
// ---------------------------------------------------------------------------

pub fn is_missing(cell: &str) -> bool {
    let t = cell.trim();
    MISSING_MARKERS.iter().any(|m| t.eq_ignore_ascii_case(m))
}

/// Numeric cell → `Some(f64)`; missing markers and non-numeric text → `None`.
pub fn parse_value(cell: &str) -> Option<f64> {
    if is_missing(cell) {
        return None;
    }
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_text(cell: &str) -> Option<String> {
    if is_missing(cell) {
        None
    } else {
        Some(cell.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Timestamp.2011,2011,Timestamp.2012,2012
18-01-2011,10,02-01-2012,NA
19-01-2011,NA,03-01-2012,7.5
20-01-2011,abc,,
";

    fn schema() -> YearSchema {
        YearSchema::new([2011, 2012])
    }

    #[test]
    fn coerces_markers_and_text_to_missing() {
        let table = read_table(SAMPLE.as_bytes(), Path::new("sample.csv"), &schema()).unwrap();
        assert_eq!(table.row_count, 3);

        let y2011 = table.year(2011).unwrap();
        assert_eq!(y2011.values, vec![Some(10.0), None, None]);
        assert_eq!(y2011.timestamps[0].as_deref(), Some("18-01-2011"));

        let y2012 = table.year(2012).unwrap();
        assert_eq!(y2012.values, vec![None, Some(7.5), None]);
        assert_eq!(y2012.timestamps[2], None);
    }

    #[test]
    fn missing_declared_columns_fail_fast() {
        let schema = YearSchema::new([2011, 2013]);
        let err = read_table(SAMPLE.as_bytes(), Path::new("sample.csv"), &schema).unwrap_err();
        match err.downcast_ref::<DataError>() {
            Some(DataError::Schema { missing, .. }) => {
                assert_eq!(missing, &vec!["Timestamp.2013".to_string(), "2013".to_string()]);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn undeclared_year_is_an_error_not_a_panic() {
        let table = read_table(SAMPLE.as_bytes(), Path::new("sample.csv"), &schema()).unwrap();
        assert!(matches!(table.year(2014), Err(DataError::UnknownYear { year: 2014 })));
    }

    #[test]
    fn short_rows_are_padded_with_missing_cells() {
        let csv = "Timestamp.2011,2011\n18-01-2011\n";
        let schema = YearSchema::new([2011]);
        let table = read_table(csv.as_bytes(), Path::new("short.csv"), &schema).unwrap();
        let col = table.year(2011).unwrap();
        assert_eq!(col.timestamps, vec![Some("18-01-2011".to_string())]);
        assert_eq!(col.values, vec![None]);
    }

    #[test]
    fn custom_column_names_and_date_format() {
        let csv = "Day,Sales\n2011/01/18,4\n";
        let schema = YearSchema::new([])
            .with_columns(2011, "Day", "Sales")
            .with_date_format("%Y/%m/%d");
        let table = read_table(csv.as_bytes(), Path::new("custom.csv"), &schema).unwrap();
        let col = table.year(2011).unwrap();
        assert_eq!(col.values, vec![Some(4.0)]);
        assert_eq!(
            table.parse_timestamp("2011/01/18"),
            chrono::NaiveDate::from_ymd_opt(2011, 1, 18)
        );
    }

    #[test]
    fn malformed_row_names_its_file_line() {
        let mut bytes = b"Timestamp.2011,2011\n18-01-2011,1\n".to_vec();
        bytes.extend_from_slice(b"19-01-2011,\xff\xfe\n");
        let schema = YearSchema::new([2011]);
        let err = read_table(bytes.as_slice(), Path::new("broken.csv"), &schema).unwrap_err();
        match err.downcast_ref::<DataError>() {
            Some(DataError::Csv { path, line, .. }) => {
                assert_eq!(path, Path::new("broken.csv"));
                assert_eq!(*line, 3);
            }
            other => panic!("expected CSV error, got {other:?}"),
        }
        assert!(err.to_string().starts_with("broken.csv line 3"));
    }

    #[test]
    fn unopenable_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        let err = load_table(&path, &schema()).unwrap_err();
        match err.downcast_ref::<DataError>() {
            Some(DataError::Io { path: p, source }) => {
                assert_eq!(p, &path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected I/O error, got {other:?}"),
        }
    }

    #[test]
    fn value_parsing() {
        assert_eq!(parse_value(" 3.25 "), Some(3.25));
        assert_eq!(parse_value("NA"), None);
        assert_eq!(parse_value("nan"), None);
        assert_eq!(parse_value("inf"), None);
        assert_eq!(parse_value("12kg"), None);
    }

    #[test]
    fn lists_only_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.csv"), "x").unwrap();
        std::fs::write(dir.path().join("a.CSV"), "x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        std::fs::create_dir(dir.path().join("dir.csv")).unwrap();

        let names: Vec<String> = list_csv_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.CSV", "b.csv"]);
    }
}
