/// The minimum of a smoothed trace inside the search range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Valley {
    /// Wavelength in nm.
    pub wavelength: f64,
    /// Filtered intensity in dB.
    pub intensity: f64,
}

/// `None` means no sample fell inside the search range.
pub type ValleyResult = Option<Valley>;

/// Find the lowest `intensity` among samples with
/// `range_start <= wavelength <= range_end`.
///
/// Ties go to the first sample in array order. Samples with a NaN wavelength
/// or intensity are not measurements and are skipped; a range holding only
/// such samples gives `None`. Pass the filtered intensity, never the raw trace.
pub fn find(wavelength: &[f64], intensity: &[f64], range_start: f64, range_end: f64) -> ValleyResult {
    let mut best: Option<Valley> = None;
    for (&wl, &y) in wavelength.iter().zip(intensity) {
        if y.is_nan() || !(range_start..=range_end).contains(&wl) {
            continue;
        }
        match best {
            Some(v) if v.intensity <= y => {}
            _ => {
                best = Some(Valley {
                    wavelength: wl,
                    intensity: y,
                })
            }
        }
    }
    best
}
