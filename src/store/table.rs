// ---------------------------------------------------------------------------
// Cell – one value of a stored table
// ---------------------------------------------------------------------------

/// A dynamically-typed table cell, as read back from CSV or a spreadsheet.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    /// A delimited-text field kept exactly as read, so a rewrite reproduces it.
    Raw(String),
    Empty,
}

impl Cell {
    /// Wrap a delimited-text field. No type is guessed: `007` stays `007`.
    pub fn from_field(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Raw(s.to_string())
        }
    }

    /// Render for delimited text (`.` decimal mark).
    pub fn to_field(&self) -> String {
        match self {
            Cell::Text(s) | Cell::Raw(s) => s.clone(),
            Cell::Number(v) => v.to_string(),
            Cell::Empty => String::new(),
        }
    }

    /// Numeric value; raw fields are parsed on access.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Raw(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) | Cell::Raw(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

// ---------------------------------------------------------------------------
// Table – header row plus data rows
// ---------------------------------------------------------------------------

/// In-memory image of a log or export file. Every row has `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Add a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.headers.len(), Cell::Empty);
        self.rows.push(row);
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// All cells of one column, top to bottom.
    pub fn column_cells<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a Cell>> {
        let idx = self.column(name)?;
        Some(self.rows.iter().map(move |r| &r[idx]))
    }

    /// Concatenate `other` below `self`, matching columns by header.
    ///
    /// Columns only `other` has are added on the right and left empty in the
    /// existing rows; columns only `self` has stay empty in the new rows.
    pub fn append(&mut self, other: Table) {
        let mapping: Vec<usize> = other
            .headers
            .iter()
            .map(|h| match self.column(h) {
                Some(i) => i,
                None => {
                    self.headers.push(h.clone());
                    self.headers.len() - 1
                }
            })
            .collect();

        let width = self.headers.len();
        for row in &mut self.rows {
            row.resize(width, Cell::Empty);
        }

        for src in other.rows {
            let mut row = vec![Cell::Empty; width];
            for (cell, &dst) in src.into_iter().zip(&mapping) {
                row[dst] = cell;
            }
            self.rows.push(row);
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_keep_their_source_text() {
        assert_eq!(Cell::from_field(""), Cell::Empty);
        for field in ["1550.25", "007", "1e3", "2024-01-01 10:00:00"] {
            assert_eq!(Cell::from_field(field).to_field(), field);
        }
        assert_eq!(Cell::from_field("007").as_text(), Some("007"));
    }

    #[test]
    fn raw_fields_parse_on_numeric_access() {
        assert_eq!(Cell::from_field("1550.25").as_f64(), Some(1550.25));
        assert_eq!(Cell::from_field("1e3").as_f64(), Some(1000.0));
        assert_eq!(Cell::from_field("amostra").as_f64(), None);
        assert_eq!(Cell::Text("12".into()).as_f64(), None);
    }

    #[test]
    fn append_keeps_existing_rows_first() {
        let mut a = Table::new(["x", "y"]);
        a.push_row(vec![1.0.into(), 2.0.into()]);
        let mut b = Table::new(["x", "y"]);
        b.push_row(vec![3.0.into(), 4.0.into()]);
        b.push_row(vec![5.0.into(), 6.0.into()]);
        a.append(b);
        let xs: Vec<f64> = a.column_cells("x").unwrap().filter_map(Cell::as_f64).collect();
        assert_eq!(xs, vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn append_aligns_columns_by_name() {
        let mut a = Table::new(["x", "note"]);
        a.push_row(vec![1.0.into(), "old".into()]);
        let mut b = Table::new(["y", "x"]);
        b.push_row(vec![9.0.into(), 2.0.into()]);
        a.append(b);
        assert_eq!(a.headers, vec!["x", "note", "y"]);
        assert_eq!(a.rows[0], vec![Cell::Number(1.0), "old".into(), Cell::Empty]);
        assert_eq!(a.rows[1], vec![Cell::Number(2.0), Cell::Empty, Cell::Number(9.0)]);
    }

    #[test]
    fn append_into_empty_table_adopts_schema() {
        let mut a = Table::default();
        let mut b = Table::new(["x"]);
        b.push_row(vec![1.0.into()]);
        a.append(b);
        assert_eq!(a.headers, vec!["x"]);
        assert_eq!(a.len(), 1);
    }
}
