use std::ops::ControlFlow;

use serde::Serialize;

use crate::data::model::{Spectrum, SpectrumCollection};
use crate::error::{BatchError, FilterError};
use crate::processing::{process, FilterParameters, Valley};
use crate::store::log_store::BatchRecord;

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Reported after each entry, on the runner's thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// 1-based count of entries processed so far.
    pub current: usize,
    pub total: usize,
    pub name: String,
}

/// Receives progress; returning `Break` cancels the run before the next entry.
pub trait ProgressSink {
    fn report(&mut self, progress: Progress) -> ControlFlow<()>;
}

impl<F> ProgressSink for F
where
    F: FnMut(Progress) -> ControlFlow<()>,
{
    fn report(&mut self, progress: Progress) -> ControlFlow<()> {
        self(progress)
    }
}

/// Sink that only writes progress to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&mut self, p: Progress) -> ControlFlow<()> {
        log::info!("[{}/{}] {}", p.current, p.total, p.name);
        ControlFlow::Continue(())
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What one spectrum contributes to a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    Emitted(Valley),
    /// No sample inside the search range.
    Skipped,
    /// Aborts the whole batch.
    Fatal(FilterError),
}

/// One point of the time-series projection; `index` counts emitted records only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub index: usize,
    pub wavelength: f64,
    pub intensity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub records: Vec<BatchRecord>,
    pub series: Vec<SeriesPoint>,
}

/// Smooth one spectrum and classify the result.
pub fn process_entry(spectrum: &Spectrum, params: &FilterParameters) -> EntryOutcome {
    match process(spectrum, params) {
        Ok(processed) => match processed.valley {
            Some(valley) => EntryOutcome::Emitted(valley),
            None => EntryOutcome::Skipped,
        },
        Err(e) => EntryOutcome::Fatal(e),
    }
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Applies one parameter set to every spectrum of a collection.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    params: FilterParameters,
    sample_name: String,
}

impl BatchRunner {
    pub fn new(params: FilterParameters, sample_name: impl Into<String>) -> Self {
        Self {
            params,
            sample_name: sample_name.into(),
        }
    }

    /// Process the collection in insertion order.
    ///
    /// Any fatal entry, or a `Break` from the sink, aborts the run and no
    /// records are returned.
    pub fn run(
        &self,
        collection: &SpectrumCollection,
        progress: &mut dyn ProgressSink,
    ) -> Result<BatchOutcome, BatchError> {
        let total = collection.len();
        let mut outcome = BatchOutcome::default();

        for (i, spectrum) in collection.iter().enumerate() {
            match process_entry(spectrum, &self.params) {
                EntryOutcome::Emitted(valley) => {
                    log::debug!(
                        "{}: valley {:.2} dB @ {:.2} nm",
                        spectrum.name,
                        valley.intensity,
                        valley.wavelength
                    );
                    outcome.series.push(SeriesPoint {
                        index: outcome.records.len(),
                        wavelength: valley.wavelength,
                        intensity: valley.intensity,
                    });
                    outcome
                        .records
                        .push(BatchRecord::new(valley, &self.sample_name, &spectrum.name));
                }
                EntryOutcome::Skipped => {
                    log::debug!("{}: no valley in range, skipped", spectrum.name);
                }
                EntryOutcome::Fatal(source) => {
                    log::error!("{}: {source}", spectrum.name);
                    return Err(BatchError::Entry {
                        file: spectrum.name.clone(),
                        source,
                    });
                }
            }

            let report = progress.report(Progress {
                current: i + 1,
                total,
                name: spectrum.name.clone(),
            });
            if report.is_break() && i + 1 < total {
                log::warn!("batch cancelled after {} of {total} spectra", i + 1);
                return Err(BatchError::Cancelled { after: i + 1 });
            }
        }

        log::info!(
            "Batch done: {} valley(s) from {total} spectra ({} skipped)",
            outcome.records.len(),
            total - outcome.records.len()
        );
        Ok(outcome)
    }
}
