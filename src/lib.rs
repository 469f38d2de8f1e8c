//! Savitzky-Golay smoothing and valley tracking for optical spectrum traces.
//!
//! Two-column text spectra are loaded into a [`SpectrumCollection`], smoothed,
//! searched for their minimum inside a wavelength window, and the valleys are
//! appended to a `.csv`/`.xlsx` log for time-series analysis. Everything runs
//! synchronously on the caller's thread; [`SessionState`] is the entry point
//! for a host application.

pub mod batch;
pub mod config;
pub mod data;
pub mod error;
pub mod processing;
pub mod session;
pub mod store;

pub use batch::{BatchOutcome, BatchRunner, LogProgress, Progress, ProgressSink, SeriesPoint};
pub use data::model::{Spectrum, SpectrumCollection};
pub use error::{BatchError, FilterError, LogError, ParameterError, ParseError, SessionError};
pub use processing::{FilterParameters, ParameterWarning, RawFilterForm, Valley, ValleyResult};
pub use session::SessionState;
pub use store::log_store::{BatchRecord, LogStore};
