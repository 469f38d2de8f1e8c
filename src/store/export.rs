use std::path::Path;

use crate::error::LogError;

use super::table::{Cell, Table};
use super::write_table;

pub const EXPORT_COLUMNS: [&str; 3] = [
    "Comprimento de Onda (nm)",
    "Intensidade Original (dB)",
    "Intensidade Filtrada (dB)",
];

/// Write wavelength, original and filtered intensity to `path`, replacing it.
///
/// `original` must already carry the same peak normalisation as `filtered`.
pub fn export_full_spectrum(
    path: &Path,
    wavelength: &[f64],
    original: &[f64],
    filtered: &[f64],
) -> Result<(), LogError> {
    let mut table = Table::new(EXPORT_COLUMNS);
    for ((&wl, &orig), &filt) in wavelength.iter().zip(original).zip(filtered) {
        table.push_row(vec![Cell::Number(wl), Cell::Number(orig), Cell::Number(filt)]);
    }
    write_table(path, &table)?;
    log::info!("Exported {} samples to {}", table.len(), path.display());
    Ok(())
}
