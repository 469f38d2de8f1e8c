use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::LogError;
use crate::processing::Valley;

use super::table::{Cell, Table};
use super::{read_table, write_table, TableFormat};

/// Log columns, in file order.
pub const LOG_COLUMNS: [&str; 5] = [
    "horario",
    "comprimento_onda_filtrado (nm)",
    "intensidade_filtrada_vale (dB)",
    "amostra",
    "arquivo_origem",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Local time as `YYYY-MM-DD HH:MM:SS.fff`.
pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// BatchRecord – one log row
// ---------------------------------------------------------------------------

/// One valley measurement destined for the log. Written once, never changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRecord {
    pub timestamp: String,
    pub wavelength: f64,
    pub intensity: f64,
    pub sample_name: String,
    pub source_file: String,
}

impl BatchRecord {
    /// Stamp a valley with the current time.
    pub fn new(valley: Valley, sample_name: &str, source_file: &str) -> Self {
        Self {
            timestamp: timestamp_now(),
            wavelength: valley.wavelength,
            intensity: valley.intensity,
            sample_name: sample_name.to_string(),
            source_file: source_file.to_string(),
        }
    }

    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::Text(self.timestamp.clone()),
            Cell::Number(self.wavelength),
            Cell::Number(self.intensity),
            Cell::Text(self.sample_name.clone()),
            Cell::Text(self.source_file.clone()),
        ]
    }
}

/// Records as a table with the log schema.
pub fn records_table(rows: &[BatchRecord]) -> Table {
    let mut table = Table::new(LOG_COLUMNS);
    for record in rows {
        table.push_row(record.to_row());
    }
    table
}

// ---------------------------------------------------------------------------
// LogStore – append-only valley log
// ---------------------------------------------------------------------------

/// The valley log at a fixed location. Appends rewrite the whole file, so
/// callers must not append to the same path concurrently.
#[derive(Debug, Clone, PartialEq)]
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    /// Bind a log path; the extension must be `.csv` or `.xlsx`.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, LogError> {
        let path = path.into();
        TableFormat::from_path(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `rows` after the existing rows and rewrite the file.
    ///
    /// A missing file is created with the log schema. No deduplication.
    pub fn append(&self, rows: &[BatchRecord]) -> Result<(), LogError> {
        let new_rows = records_table(rows);

        let table = if self.path.exists() {
            let mut existing = read_table(&self.path)?;
            let before = existing.len();
            existing.append(new_rows);
            log::debug!(
                "{}: {before} existing rows, {} after append",
                self.path.display(),
                existing.len()
            );
            existing
        } else {
            new_rows
        };

        write_table(&self.path, &table)?;
        log::info!("Logged {} valley(s) to {}", rows.len(), self.path.display());
        Ok(())
    }

    /// Current contents; an absent file reads as an empty log.
    pub fn read(&self) -> Result<Table, LogError> {
        if self.path.exists() {
            read_table(&self.path)
        } else {
            Ok(Table::new(LOG_COLUMNS))
        }
    }
}

/// Append to the log at `path` (see [`LogStore::append`]).
pub fn append(path: &Path, rows: &[BatchRecord]) -> Result<(), LogError> {
    LogStore::new(path)?.append(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(i: usize) -> BatchRecord {
        BatchRecord::new(
            Valley {
                wavelength: 1550.0 + i as f64,
                intensity: -20.0 - i as f64,
            },
            "amostra A",
            &format!("file_{i}.txt"),
        )
    }

    #[test]
    fn timestamp_has_millisecond_resolution() {
        let ts = timestamp_now();
        assert_eq!(ts.len(), "2024-01-01 00:00:00.000".len());
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn first_append_establishes_schema() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::new(dir.path().join("log.csv")).unwrap();
        store.append(&[record(0)]).unwrap();
        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with(
            "horario;comprimento_onda_filtrado (nm);intensidade_filtrada_vale (dB);amostra;arquivo_origem\n"
        ));
        assert!(text.contains(";1550;-20;amostra A;file_0.txt"));
    }

    #[test]
    fn append_n_then_m_rows_in_order() {
        for name in ["log.csv", "log.xlsx"] {
            let dir = tempfile::tempdir().unwrap();
            let store = LogStore::new(dir.path().join(name)).unwrap();
            store.append(&[record(0), record(1)]).unwrap();
            store.append(&[record(2), record(3), record(4)]).unwrap();

            let table = store.read().unwrap();
            assert_eq!(table.headers, LOG_COLUMNS);
            assert_eq!(table.len(), 5);
            let files: Vec<&str> = table
                .column_cells("arquivo_origem")
                .unwrap()
                .filter_map(Cell::as_text)
                .collect();
            assert_eq!(files, ["file_0.txt", "file_1.txt", "file_2.txt", "file_3.txt", "file_4.txt"]);
        }
    }

    #[test]
    fn earlier_rows_survive_later_appends_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::new(dir.path().join("log.csv")).unwrap();
        let named = |sample: &str, file: &str| {
            BatchRecord::new(Valley { wavelength: 1550.5, intensity: -20.0 }, sample, file)
        };
        store.append(&[named("007", "a.txt"), named("1e3", "b.txt")]).unwrap();
        let before = std::fs::read_to_string(store.path()).unwrap();
        assert!(before.contains(";007;a.txt\n"));
        assert!(before.contains(";1e3;b.txt\n"));

        store.append(&[named("S", "c.txt")]).unwrap();
        store.append(&[named("S", "d.txt")]).unwrap();
        let after = std::fs::read_to_string(store.path()).unwrap();
        assert!(after.starts_with(&before), "{after}");

        let table = store.read().unwrap();
        let samples: Vec<String> = table
            .column_cells("amostra")
            .unwrap()
            .map(Cell::to_field)
            .collect();
        assert_eq!(samples, ["007", "1e3", "S", "S"]);
    }

    #[test]
    fn duplicates_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::new(dir.path().join("log.csv")).unwrap();
        let r = record(7);
        store.append(&[r.clone()]).unwrap();
        store.append(&[r]).unwrap();
        assert_eq!(store.read().unwrap().len(), 2);
    }

    #[test]
    fn unsupported_extension() {
        assert!(matches!(LogStore::new("log.json"), Err(LogError::Unsupported { .. })));
        assert!(matches!(
            append(Path::new("log.txt"), &[record(0)]),
            Err(LogError::Unsupported { .. })
        ));
    }

    #[test]
    fn unreadable_existing_log_is_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.xlsx");
        std::fs::write(&path, b"not a workbook").unwrap();
        assert!(append(&path, &[record(0)]).is_err());
        assert_eq!(std::fs::read(&path).unwrap(), b"not a workbook");
    }
}
