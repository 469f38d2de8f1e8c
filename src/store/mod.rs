/// Persistence layer: tabular files selected by extension.
///
/// ```text
///   Table ──► .csv  (';' separated, '.' decimals)
///         └─► .xlsx (single "Dados" sheet)
/// ```
///
/// Writes always replace the whole file: the new content goes to a temporary
/// file next to the target, which is then renamed over it.

pub mod delimited;
pub mod export;
pub mod log_store;
pub mod table;
pub mod xlsx;

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::LogError;

pub use table::{Cell, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Xlsx,
}

impl TableFormat {
    /// Dispatch by extension (case-insensitive). Anything but `.csv`/`.xlsx` is unsupported.
    pub fn from_path(path: &Path) -> Result<Self, LogError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(TableFormat::Csv),
            "xlsx" => Ok(TableFormat::Xlsx),
            _ => Err(LogError::Unsupported {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Read a whole table file.
pub fn read_table(path: &Path) -> Result<Table, LogError> {
    match TableFormat::from_path(path)? {
        TableFormat::Csv => delimited::read(path),
        TableFormat::Xlsx => xlsx::read(path),
    }
}

/// Replace `path` with `table`. On failure the previous file is left as it was.
pub fn write_table(path: &Path, table: &Table) -> Result<(), LogError> {
    let bytes = match TableFormat::from_path(path)? {
        TableFormat::Csv => delimited::to_bytes(table).map_err(|source| LogError::Csv {
            path: path.to_path_buf(),
            source,
        })?,
        TableFormat::Xlsx => xlsx::to_bytes(table).map_err(|e| LogError::Xlsx {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?,
    };
    replace_file(path, &bytes)
}

fn replace_file(path: &Path, bytes: &[u8]) -> Result<(), LogError> {
    let io_error = |e: std::io::Error| LogError::from_io(path, e);

    // A target another program holds open (or a read-only one) must fail
    // here, before the rename could silently replace it.
    let existing = match OpenOptions::new().write(true).open(path) {
        Ok(file) => Some(file.metadata().map_err(io_error)?.permissions()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(io_error(e)),
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_error)?;
    tmp.write_all(bytes).map_err(io_error)?;
    tmp.as_file().sync_all().map_err(io_error)?;
    if let Some(permissions) = existing {
        tmp.as_file().set_permissions(permissions).map_err(io_error)?;
    }
    tmp.persist(path).map_err(|e| io_error(e.error))?;
    Ok(())
}
