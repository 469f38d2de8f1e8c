use std::path::Path;

use crate::error::ParseError;

use super::delimiter::{sniff_file, Delimiter};
use super::model::{Spectrum, SpectrumCollection};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load several spectrum files into a fresh collection, in the given order.
///
/// Spectra are named after the file's base name; a repeated name becomes
/// `<name>_(<n>)`. The first failing file aborts the whole load, so a caller
/// holding an older collection keeps it intact.
pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<SpectrumCollection, ParseError> {
    let mut collection = SpectrumCollection::new();
    for path in paths {
        let spectrum = load_file(path.as_ref())?;
        let stored = collection.insert(spectrum);
        log::debug!("loaded {stored}");
    }
    log::info!("Loaded {} spectra", collection.len());
    Ok(collection)
}

/// Load a two-column text file (wavelength, intensity).
///
/// The delimiter is sniffed from the first line. If parsing with it fails the
/// file is parsed again with plain whitespace splitting.
pub fn load_file(path: &Path) -> Result<Spectrum, ParseError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let delimiter = sniff_file(path);
    let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match (parse_text(&name, &text, delimiter), delimiter) {
        (Ok(spectrum), _) => Ok(spectrum),
        (Err(e), Some(d)) => {
            log::warn!(
                "{name}: parsing with '{}' failed ({e}); retrying with whitespace",
                d.as_char()
            );
            parse_text(&name, &text, None)
        }
        (Err(e), None) => Err(e),
    }
}

/// Parse an in-memory buffer with an explicit delimiter (`None` = whitespace).
///
/// Blank lines and `#` comments are skipped. Every data row must have the
/// same number of columns, at least two; only the first two are kept.
pub fn parse_text(
    name: &str,
    text: &str,
    delimiter: Option<Delimiter>,
) -> Result<Spectrum, ParseError> {
    let mut wavelength = Vec::new();
    let mut intensity = Vec::new();
    let mut columns: Option<usize> = None;

    for (line_no, raw_line) in text.lines().enumerate() {
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let row = parse_row(name, line_no + 1, line, delimiter)?;
        let expected = *columns.get_or_insert(row.len());
        if row.len() != expected {
            return Err(ParseError::Ragged {
                name: name.to_string(),
                line: line_no + 1,
                expected,
                found: row.len(),
            });
        }
        if expected < 2 {
            return Err(ParseError::TooFewColumns {
                name: name.to_string(),
                columns: expected,
            });
        }

        wavelength.push(row[0]);
        intensity.push(row[1]);
    }

    if wavelength.is_empty() {
        return Err(ParseError::Empty {
            name: name.to_string(),
        });
    }

    Ok(Spectrum::new(name, wavelength, intensity))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_row(
    name: &str,
    line: usize,
    text: &str,
    delimiter: Option<Delimiter>,
) -> Result<Vec<f64>, ParseError> {
    let parse = |tok: &str| {
        let tok = tok.trim();
        tok.parse::<f64>().map_err(|_| ParseError::NotNumeric {
            name: name.to_string(),
            line,
            token: tok.to_string(),
        })
    };

    match delimiter {
        Some(d) => text.split(d.as_char()).map(parse).collect(),
        None => text.split_whitespace().map(parse).collect(),
    }
}
