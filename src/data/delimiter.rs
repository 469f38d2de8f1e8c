use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

/// A comma between two digits is a decimal mark (`0,001`), not a separator,
/// unless the line already uses `.` as its decimal mark.
static DECIMAL_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d,\d").unwrap());

/// Column separator guessed from the first line of a file.
///
/// `None` everywhere in this module means "split on whitespace".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Semicolon,
    Comma,
}

impl Delimiter {
    pub fn as_char(self) -> char {
        match self {
            Delimiter::Semicolon => ';',
            Delimiter::Comma => ',',
        }
    }
}

/// Pick a delimiter for `first_line`. First matching rule wins:
/// `;` present, decimal comma present (→ whitespace), `,` present, else whitespace.
/// `1500,0.1` keeps `,` as the separator because `.` is the decimal mark there.
pub fn sniff(first_line: &str) -> Option<Delimiter> {
    if first_line.contains(';') {
        return Some(Delimiter::Semicolon);
    }
    if DECIMAL_COMMA.is_match(first_line) && !first_line.contains('.') {
        return None;
    }
    if first_line.contains(',') {
        return Some(Delimiter::Comma);
    }
    None
}

/// Sniff the first line of a file. Best effort: unreadable files fall back to whitespace.
pub fn sniff_file(path: &Path) -> Option<Delimiter> {
    let file = File::open(path).ok()?;
    let mut first_line = String::new();
    BufReader::new(file).read_line(&mut first_line).ok()?;
    sniff(&first_line)
}
