use crate::pipeline::{FileSummary, YearView};
use crate::stats::{Summary, NO_DATA_MESSAGE, UNDEFINED};

// ---------------------------------------------------------------------------
// Plain-text rendering for the command line
// ---------------------------------------------------------------------------

/// Render one file of a comparison: the windowed table, then its statistics.
pub fn render_file_summary(index: usize, summary: &FileSummary) -> String {
    let mut out = format!("CSV File {}: {}\n", index + 1, summary.path.display());
    if let Some(span) = summary.available {
        out.push_str(&format!("  available: {span}\n"));
    }

    if !summary.summary.has_rows() {
        out.push_str(&format!("  No data available for CSV File {}.\n", index + 1));
        return out;
    }

    out.push_str(&format!("  {:<12} {:>12}\n", "Timestamp", "Value"));
    for o in summary.series.observations() {
        out.push_str(&format!("  {:<12} {:>12}\n", o.timestamp, o.value));
    }
    match &summary.summary {
        Summary::Stats(stats) => out.push_str(&stats.report("  Statistics")),
        other => out.push_str(&other.to_string()),
    }
    out
}

/// Render the single-year view with the dashboard's statistic sentences.
///
/// Rows are listed whenever the window selected any; statistics the values
/// cannot determine are printed as "undefined".
pub fn render_year_view(view: &YearView) -> String {
    let mut out = format!("CSV File Selected: {}\n", view.path.display());

    if !view.summary.has_rows() {
        out.push_str(NO_DATA_MESSAGE);
        out.push('\n');
        return out;
    }

    out.push_str(&format!("{:<12} {:>12}\n", "Date", view.year));
    for (ts, v) in view.timestamps.iter().zip(&view.values) {
        let value = v.map_or_else(|| "NA".to_string(), |v| v.to_string());
        out.push_str(&format!("{:<12} {:>12}\n", ts.format("%d-%m-%Y").to_string(), value));
    }

    let stats = view.summary.stats();
    let step = match stats.and_then(|s| s.max_abs_step_change) {
        Some(step) => format!("±{step}"),
        None => format!("{UNDEFINED} (not enough data)"),
    };
    let (max, min) = match stats {
        Some(s) => (s.max_value.to_string(), s.min_value.to_string()),
        None => (UNDEFINED.to_string(), UNDEFINED.to_string()),
    };
    out.push_str(&format!(
        "The broader range where the data was oscillating the most in {}: {step}\n",
        view.year
    ));
    out.push_str(&format!("Highest value in Timestamp.{} column: {max}\n", view.year));
    out.push_str(&format!("Lowest value in Timestamp.{} column: {min}\n", view.year));
    out
}
