use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Per-component error types
// ---------------------------------------------------------------------------

/// A spectrum file could not be turned into a two-column trace.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{name}: line {line}: '{token}' is not a number")]
    NotNumeric {
        name: String,
        line: usize,
        token: String,
    },
    #[error("{name}: line {line} has {found} columns, expected {expected}")]
    Ragged {
        name: String,
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("{name} does not look like a two-column file ({columns} column(s))")]
    TooFewColumns { name: String, columns: usize },
    #[error("{name} contains no data rows")]
    Empty { name: String },
}

/// Filter or range input that is not a number at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("{field} must be an integer, got {value:?}")]
    NotInteger { field: &'static str, value: String },
    #[error("{field} must be numeric (e.g. 1500.0), got {value:?}")]
    NotNumeric { field: &'static str, value: String },
}

/// The smoothing engine refused its input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("window {window} is larger than the signal ({len} samples)")]
    WindowTooLarge { window: usize, len: usize },
    #[error("invalid filter parameters: window {window}, order {order}")]
    InvalidParameters { window: usize, order: usize },
}

/// A batch run was aborted; nothing was written.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("batch aborted at {file}: {source}")]
    Entry {
        file: String,
        #[source]
        source: FilterError,
    },
    #[error("batch cancelled after {after} spectra")]
    Cancelled { after: usize },
}

/// Reading or rewriting a log / export table failed.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("permission denied for {path} (is it open in another program?)")]
    PermissionDenied { path: PathBuf },
    #[error("unsupported table extension: {path} (use .xlsx or .csv)")]
    Unsupported { path: PathBuf },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("spreadsheet error in {path}: {message}")]
    Xlsx { path: PathBuf, message: String },
    #[error("{path} is not a readable table: {message}")]
    Malformed { path: PathBuf, message: String },
}

impl LogError {
    /// Classify an I/O failure; a locked or read-only target is reported on its own.
    pub(crate) fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        // 32/33: Windows sharing / lock violation (file open in a spreadsheet program)
        let locked = cfg!(windows) && matches!(source.raw_os_error(), Some(32 | 33));
        if locked || source.kind() == std::io::ErrorKind::PermissionDenied {
            LogError::PermissionDenied {
                path: path.to_path_buf(),
            }
        } else {
            LogError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Session-level umbrella
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Batch(#[from] BatchError),
    #[error(transparent)]
    Log(#[from] LogError),
    #[error("no spectrum is selected")]
    NoActiveSpectrum,
    #[error("no spectrum named {0:?} is loaded")]
    UnknownSpectrum(String),
    #[error("no filtered data yet; run the filter first")]
    NotProcessed,
    #[error("no valley detected in the search range")]
    NoValley,
    #[error("a sample name is required")]
    MissingSampleName,
    #[error("no log file defined")]
    NoLogPath,
}
