use std::path::PathBuf;

use thiserror::Error;

/// Typed failures raised while loading or querying a dataset.
///
/// Data-quality problems (missing cells, bad timestamps, empty windows) are
/// never errors; they are recovered inside the pipeline. These variants cover
/// the cases where a request cannot be answered at all.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `line` is the 1-based line of the file; the header is line 1.
    #[error("{} line {line}: malformed CSV", .path.display())]
    Csv {
        path: PathBuf,
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("{}: declared columns missing from header: {}", .path.display(), .missing.join(", "))]
    Schema { path: PathBuf, missing: Vec<String> },

    #[error("year {year} is not part of the declared schema")]
    UnknownYear { year: u16 },

    #[error("parsing config {}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{input}' is not a date (expected YYYY-MM-DD or DD-MM-YYYY)")]
    InvalidDate { input: String },
}
