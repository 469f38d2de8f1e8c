use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::{Workbook, XlsxError};

use crate::error::LogError;

use super::table::{Cell, Table};

/// Name of the single worksheet written to every workbook.
pub const SHEET_NAME: &str = "Dados";

/// Read the first worksheet; its first row is the header.
pub(super) fn read(path: &Path) -> Result<Table, LogError> {
    let file = File::open(path).map_err(|e| LogError::from_io(path, e))?;
    let xlsx_error = |e: calamine::XlsxError| LogError::Xlsx {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut workbook: Xlsx<_> = Xlsx::new(BufReader::new(file)).map_err(xlsx_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LogError::Malformed {
            path: path.to_path_buf(),
            message: "workbook has no worksheet".into(),
        })?
        .map_err(xlsx_error)?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Table::default());
    };

    let mut table = Table::new(header_row.iter().map(|c| c.to_string()));
    for row in rows {
        table.push_row(row.iter().map(cell_from_data).collect());
    }
    Ok(table)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Float(v) => Cell::Number(*v),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::String(s) => Cell::Text(s.clone()),
        other => Cell::Text(other.to_string()),
    }
}

pub(super) fn to_bytes(table: &Table) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in table.headers.iter().enumerate() {
        sheet.write_string(0, col as u16, header)?;
    }
    for (r, row) in table.rows.iter().enumerate() {
        let r = (r + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(s) | Cell::Raw(s) => {
                    sheet.write_string(r, col as u16, s)?;
                }
                Cell::Number(v) => {
                    sheet.write_number(r, col as u16, *v)?;
                }
                Cell::Empty => {}
            }
        }
    }

    workbook.save_to_buffer()
}
