//! Per-spectrum signal processing: parameter correction, Savitzky-Golay
//! smoothing and the range-limited valley search.

pub mod params;
pub mod pipeline;
pub mod savgol;
pub mod valley;

pub use params::{FilterParameters, ParameterWarning, RawFilterForm};
pub use pipeline::{process, Processed};
pub use valley::{Valley, ValleyResult};
