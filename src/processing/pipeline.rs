use crate::data::model::Spectrum;
use crate::error::FilterError;

use super::params::FilterParameters;
use super::savgol;
use super::valley::{self, ValleyResult};

/// Result of smoothing one spectrum and searching its valley.
#[derive(Debug, Clone, PartialEq)]
pub struct Processed {
    /// Raw intensity, shifted by the same offset as `filtered` when normalising.
    pub trace: Vec<f64>,
    /// Smoothed intensity, same length as `trace`.
    pub filtered: Vec<f64>,
    pub valley: ValleyResult,
}

/// Subtract the maximum so the peak sits at 0.
pub fn normalize_to_peak(intensity: &[f64]) -> Vec<f64> {
    let max = intensity.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    intensity.iter().map(|&y| y - max).collect()
}

/// Smooth a spectrum and locate its valley inside the parameter range.
pub fn process(spectrum: &Spectrum, params: &FilterParameters) -> Result<Processed, FilterError> {
    let trace = if params.normalize_peak() {
        normalize_to_peak(&spectrum.intensity)
    } else {
        spectrum.intensity.clone()
    };

    let filtered = savgol::smooth(&trace, params.window(), params.order())?;
    let valley = valley::find(
        &spectrum.wavelength,
        &filtered,
        params.range_start(),
        params.range_end(),
    );

    Ok(Processed {
        trace,
        filtered,
        valley,
    })
}
