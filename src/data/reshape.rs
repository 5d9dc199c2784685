use super::model::{LongSeries, Observation, WideYearTable};

/// Outcome of flattening a wide table, with the bookkeeping the caller may
/// want to surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Reshaped {
    pub series: LongSeries,
    /// Pairs whose timestamp was present but did not parse as a date.
    pub dropped_timestamps: usize,
    /// Pairs whose timestamp was present but whose value was missing.
    pub dropped_values: usize,
}

/// Flatten every year's (timestamp, value) pair into one long series.
///
/// Rows are walked in file order and, inside a row, years in ascending order.
/// A pair is kept only when both cells are present and the timestamp parses;
/// rows are not aligned across years, so a row may yield several pairs.
pub fn reshape(table: &WideYearTable) -> LongSeries {
    reshape_counted(table).series
}

pub fn reshape_counted(table: &WideYearTable) -> Reshaped {
    let mut observations = Vec::new();
    let mut dropped_timestamps = 0usize;
    let mut dropped_values = 0usize;

    for row in 0..table.row_count {
        for column in table.years.values() {
            let Some(Some(text)) = column.timestamps.get(row) else {
                continue;
            };
            let Some(value) = column.values.get(row).copied().flatten() else {
                dropped_values += 1;
                continue;
            };
            match table.parse_timestamp(text) {
                Some(timestamp) => observations.push(Observation { timestamp, value }),
                None => dropped_timestamps += 1,
            }
        }
    }

    if dropped_timestamps > 0 {
        log::warn!("Dropped {dropped_timestamps} rows with unparsable timestamps while reshaping");
    }
    log::debug!(
        "Reshaped {} rows into {} observations ({} without a value)",
        table.row_count,
        observations.len(),
        dropped_values
    );

    Reshaped {
        series: LongSeries::from_observations(observations),
        dropped_timestamps,
        dropped_values,
    }
}
