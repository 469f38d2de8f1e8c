use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::processing::RawFilterForm;

/// Defaults a host starts from; command-line flags override them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: i64,
    pub order: i64,
    pub normalize: bool,
    pub range_start: Option<f64>,
    pub range_end: Option<f64>,
    pub sample_name: Option<String>,
    pub log_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window: 21,
            order: 3,
            normalize: false,
            range_start: None,
            range_end: None,
            sample_name: None,
            log_path: None,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file; missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading settings {}", path_ref.display()))?;
        let settings: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("parsing settings {}", path_ref.display()))?;
        Ok(settings)
    }

    /// The filter part of the settings, in the same shape a form would supply.
    pub fn to_form(&self) -> RawFilterForm {
        RawFilterForm {
            window: self.window.to_string(),
            order: self.order.to_string(),
            range_start: self.range_start.map(|v| v.to_string()),
            range_end: self.range_end.map(|v| v.to_string()),
            normalize: self.normalize,
        }
    }
}
