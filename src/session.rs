use std::path::{Path, PathBuf};

use crate::batch::{BatchOutcome, BatchRunner, ProgressSink};
use crate::data::loader;
use crate::data::model::{Spectrum, SpectrumCollection};
use crate::error::SessionError;
use crate::processing::{process, FilterParameters, ParameterWarning, Processed, RawFilterForm};
use crate::store::export::export_full_spectrum;
use crate::store::log_store::{BatchRecord, LogStore};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// The last single-spectrum run, kept for logging and export.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleRun {
    pub spectrum: String,
    pub params: FilterParameters,
    pub processed: Processed,
}

/// Everything a host keeps between user actions, independent of any UI.
#[derive(Debug, Default)]
pub struct SessionState {
    collection: SpectrumCollection,
    active: Option<String>,
    last_run: Option<SingleRun>,
    log: Option<LogStore>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the loaded spectra. On error the current collection is kept.
    /// The first loaded spectrum becomes active.
    pub fn load_files<P: AsRef<Path>>(
        &mut self,
        paths: &[P],
    ) -> Result<&SpectrumCollection, SessionError> {
        let collection = loader::load_files(paths)?;
        self.active = collection.first().map(|s| s.name.clone());
        self.last_run = None;
        self.collection = collection;
        Ok(&self.collection)
    }

    pub fn collection(&self) -> &SpectrumCollection {
        &self.collection
    }

    /// Make `name` the active spectrum.
    pub fn select_active(&mut self, name: &str) -> Result<&Spectrum, SessionError> {
        if !self.collection.contains(name) {
            return Err(SessionError::UnknownSpectrum(name.to_string()));
        }
        if self.active.as_deref() != Some(name) {
            self.active = Some(name.to_string());
            self.last_run = None;
        }
        self.active().ok_or(SessionError::NoActiveSpectrum)
    }

    pub fn active(&self) -> Option<&Spectrum> {
        self.active.as_deref().and_then(|n| self.collection.get(n))
    }

    /// Validate a form; missing range bounds default to the active spectrum's span.
    pub fn filter_parameters(
        &self,
        raw: &RawFilterForm,
    ) -> Result<(FilterParameters, Vec<ParameterWarning>), SessionError> {
        let reference = self.active().ok_or(SessionError::NoActiveSpectrum)?;
        Ok(FilterParameters::normalize(raw, reference)?)
    }

    /// Smooth the active spectrum and search its valley.
    pub fn run_single(&mut self, params: &FilterParameters) -> Result<&SingleRun, SessionError> {
        let spectrum = self.active().ok_or(SessionError::NoActiveSpectrum)?;
        let processed = process(spectrum, params)?;
        match processed.valley {
            Some(v) => log::info!(
                "{}: valley {:.2} dB @ {:.2} nm",
                spectrum.name,
                v.intensity,
                v.wavelength
            ),
            None => log::info!("{}: no samples inside the search range", spectrum.name),
        }

        let run = SingleRun {
            spectrum: spectrum.name.clone(),
            params: *params,
            processed,
        };
        Ok(&*self.last_run.insert(run))
    }

    pub fn last_run(&self) -> Option<&SingleRun> {
        self.last_run.as_ref()
    }

    /// Run every loaded spectrum through the same parameters.
    pub fn run_batch(
        &self,
        params: &FilterParameters,
        sample_name: &str,
        progress: &mut dyn ProgressSink,
    ) -> Result<BatchOutcome, SessionError> {
        if sample_name.trim().is_empty() {
            return Err(SessionError::MissingSampleName);
        }
        let runner = BatchRunner::new(*params, sample_name);
        Ok(runner.run(&self.collection, progress)?)
    }

    /// Define the log file used by every later append.
    pub fn set_log_path(&mut self, path: impl Into<PathBuf>) -> Result<(), SessionError> {
        let store = LogStore::new(path)?;
        log::info!("Log file set to {}", store.path().display());
        self.log = Some(store);
        Ok(())
    }

    pub fn log_path(&self) -> Option<&Path> {
        self.log.as_ref().map(|l| l.path())
    }

    /// Append the valley of the last single run to the log.
    pub fn append_log(&self, sample_name: &str) -> Result<BatchRecord, SessionError> {
        let run = self.last_run.as_ref().ok_or(SessionError::NotProcessed)?;
        let valley = run.processed.valley.ok_or(SessionError::NoValley)?;
        let log = self.log.as_ref().ok_or(SessionError::NoLogPath)?;
        if sample_name.trim().is_empty() {
            return Err(SessionError::MissingSampleName);
        }

        let record = BatchRecord::new(valley, sample_name, &run.spectrum);
        log.append(std::slice::from_ref(&record))?;
        Ok(record)
    }

    /// Append all records of a finished batch to the log.
    pub fn append_batch_log(&self, outcome: &BatchOutcome) -> Result<(), SessionError> {
        let log = self.log.as_ref().ok_or(SessionError::NoLogPath)?;
        log.append(&outcome.records)?;
        Ok(())
    }

    /// Write wavelength, original and filtered intensity of the last run.
    pub fn export_full_spectrum(&self, path: &Path) -> Result<(), SessionError> {
        let run = self.last_run.as_ref().ok_or(SessionError::NotProcessed)?;
        let spectrum = self
            .collection
            .get(&run.spectrum)
            .ok_or_else(|| SessionError::UnknownSpectrum(run.spectrum.clone()))?;
        export_full_spectrum(
            path,
            &spectrum.wavelength,
            &run.processed.trace,
            &run.processed.filtered,
        )?;
        Ok(())
    }

    /// Drop all spectra and results; the log path is kept.
    pub fn reset(&mut self) {
        self.collection.clear();
        self.active = None;
        self.last_run = None;
    }
}
