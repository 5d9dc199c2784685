use std::fmt;

use serde::Serialize;

/// Message shown whenever a window selects nothing to summarize.
pub const NO_DATA_MESSAGE: &str = "No data available for the selected date range.";

/// Shown in place of a statistic the window's values cannot determine.
pub const UNDEFINED: &str = "undefined";

/// Summary statistics for a windowed series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStatistics {
    /// Number of defined values in the series.
    pub count: usize,
    /// Largest |v[i] - v[i-1]| over consecutive defined pairs. `None` when the
    /// series has no such pair.
    pub max_abs_step_change: Option<f64>,
    pub max_value: f64,
    pub min_value: f64,
}

impl SeriesStatistics {
    /// Compute statistics over values in sequence order, skipping `None`.
    ///
    /// Returns `None` if no value is defined.
    pub fn compute(values: &[Option<f64>]) -> Option<Self> {
        let defined: Vec<f64> = values.iter().flatten().copied().collect();
        if defined.is_empty() {
            return None;
        }

        let max_value = defined.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_value = defined.iter().copied().fold(f64::INFINITY, f64::min);

        // A step only counts when both ends are known; a gap breaks the chain.
        let max_abs_step_change = values
            .windows(2)
            .filter_map(|w| match (w[0], w[1]) {
                (Some(a), Some(b)) => Some((b - a).abs()),
                _ => None,
            })
            .reduce(f64::max);

        Some(SeriesStatistics {
            count: defined.len(),
            max_abs_step_change,
            max_value,
            min_value,
        })
    }

    /// Format as a multi-line report string.
    pub fn report(&self, label: &str) -> String {
        let step = match self.max_abs_step_change {
            Some(s) => format!("±{s}"),
            None => "undefined (fewer than two consecutive values)".to_string(),
        };
        format!(
            "{label}:\n  Points: {}\n  Largest step change: {step}\n  \
             Highest value: {}\n  Lowest value: {}\n",
            self.count, self.max_value, self.min_value
        )
    }
}

// ---------------------------------------------------------------------------
// Summary – statistics, rows without values, or "nothing in range"
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Summary {
    /// The window selected no rows.
    NoData,
    /// The window selected `rows` rows but none of them has a value.
    Undefined { rows: usize },
    Stats(SeriesStatistics),
}

impl Summary {
    /// Summarize a windowed series. Empty input short-circuits to `NoData`
    /// without computing anything.
    pub fn of(values: &[Option<f64>]) -> Self {
        if values.is_empty() {
            return Summary::NoData;
        }
        match SeriesStatistics::compute(values) {
            Some(stats) => Summary::Stats(stats),
            None => Summary::Undefined { rows: values.len() },
        }
    }

    pub fn stats(&self) -> Option<&SeriesStatistics> {
        match self {
            Summary::Stats(s) => Some(s),
            Summary::NoData | Summary::Undefined { .. } => None,
        }
    }

    /// True when the window selected at least one row, with or without values.
    pub fn has_rows(&self) -> bool {
        !matches!(self, Summary::NoData)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Summary::NoData => write!(f, "{NO_DATA_MESSAGE}"),
            Summary::Undefined { rows } => write!(
                f,
                "Summary:\n  Points: 0 of {rows}\n  Largest step change: {UNDEFINED}\n  \
                 Highest value: {UNDEFINED}\n  Lowest value: {UNDEFINED}\n"
            ),
            Summary::Stats(s) => write!(f, "{}", s.report("Summary")),
        }
    }
}
