use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::LogError;

use super::table::{Cell, Table};

/// Field separator for delimited-text tables; the decimal mark is always `.`.
pub const SEPARATOR: u8 = b';';

pub(super) fn read(path: &Path) -> Result<Table, LogError> {
    let file = File::open(path).map_err(|e| LogError::from_io(path, e))?;
    let mut reader = ReaderBuilder::new().delimiter(SEPARATOR).from_reader(file);
    let csv_error = |source| LogError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let mut table = Table::new(headers);

    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        table.push_row(record.iter().map(Cell::from_field).collect());
    }

    Ok(table)
}

pub(super) fn to_bytes(table: &Table) -> Result<Vec<u8>, csv::Error> {
    let mut writer = WriterBuilder::new()
        .delimiter(SEPARATOR)
        .from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(Cell::to_field))?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
