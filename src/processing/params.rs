use std::fmt;

use crate::data::model::Spectrum;
use crate::error::ParameterError;

// ---------------------------------------------------------------------------
// Raw input, as a host form hands it over
// ---------------------------------------------------------------------------

/// Unvalidated filter settings. Range fields that are absent or blank mean
/// "use the reference spectrum's wavelength span".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFilterForm {
    pub window: String,
    pub order: String,
    pub range_start: Option<String>,
    pub range_end: Option<String>,
    pub normalize: bool,
}

/// A correction applied while building [`FilterParameters`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterWarning {
    WindowMadeOdd { from: i64, to: usize },
    WindowRaised { from: i64, to: usize },
    OrderClamped { from: i64, to: usize },
    RangeReset { start: f64, end: f64 },
}

impl fmt::Display for ParameterWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterWarning::WindowMadeOdd { from, to } => {
                write!(f, "window {from} is even, using {to}")
            }
            ParameterWarning::WindowRaised { from, to } => {
                write!(f, "window {from} is too small, using {to}")
            }
            ParameterWarning::OrderClamped { from, to } => {
                write!(f, "polynomial order {from} is out of range, using {to}")
            }
            ParameterWarning::RangeReset { start, end } => write!(
                f,
                "range start must be below range end, searching the full span {start}..{end}"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterParameters – always valid once built
// ---------------------------------------------------------------------------

/// Smoothing and search settings. Fields are private so an instance can only
/// exist in corrected form: odd `window >= 3`, `1 <= order < window`,
/// `range_start <= range_end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParameters {
    window: usize,
    order: usize,
    range_start: f64,
    range_end: f64,
    normalize_peak: bool,
}

impl FilterParameters {
    /// Parse and correct a raw form against the spectrum the range defaults to.
    pub fn normalize(
        raw: &RawFilterForm,
        reference: &Spectrum,
    ) -> Result<(Self, Vec<ParameterWarning>), ParameterError> {
        let window = parse_int("window", &raw.window)?;
        let order = parse_int("order", &raw.order)?;
        let range_start = parse_bound("range start", raw.range_start.as_deref())?;
        let range_end = parse_bound("range end", raw.range_end.as_deref())?;

        Ok(Self::correct(
            window,
            order,
            range_start,
            range_end,
            raw.normalize,
            reference.wavelength_span(),
        ))
    }

    /// Apply the correction rules to already-numeric input.
    ///
    /// 1. even window → window + 1 (and never below 3)
    /// 2. order >= window → max(1, window - 2)
    /// 3. order < 1 → 1
    /// 4. missing bounds → `span`; start >= end → the whole `span`
    pub fn correct(
        window: i64,
        order: i64,
        range_start: Option<f64>,
        range_end: Option<f64>,
        normalize_peak: bool,
        span: (f64, f64),
    ) -> (Self, Vec<ParameterWarning>) {
        let mut warnings = Vec::new();

        let mut w = window;
        if w % 2 == 0 {
            w += 1;
            warnings.push(ParameterWarning::WindowMadeOdd {
                from: window,
                to: w.max(3) as usize,
            });
        }
        if w < 3 {
            if !matches!(warnings.last(), Some(ParameterWarning::WindowMadeOdd { .. })) {
                warnings.push(ParameterWarning::WindowRaised { from: window, to: 3 });
            }
            w = 3;
        }
        let w = w as usize;

        let o = if order >= w as i64 {
            (w as i64 - 2).max(1) as usize
        } else if order < 1 {
            1
        } else {
            order as usize
        };
        if o as i64 != order {
            warnings.push(ParameterWarning::OrderClamped { from: order, to: o });
        }

        let mut start = range_start.unwrap_or(span.0);
        let mut end = range_end.unwrap_or(span.1);
        if start >= end && (range_start.is_some() || range_end.is_some()) {
            start = span.0;
            end = span.1;
            warnings.push(ParameterWarning::RangeReset { start, end });
        }

        for warning in &warnings {
            log::warn!("{warning}");
        }

        (
            Self {
                window: w,
                order: o,
                range_start: start,
                range_end: end,
                normalize_peak,
            },
            warnings,
        )
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn range_start(&self) -> f64 {
        self.range_start
    }

    pub fn range_end(&self) -> f64 {
        self.range_end
    }

    /// Whether the trace is shifted so its maximum sits at 0 before filtering.
    pub fn normalize_peak(&self) -> bool {
        self.normalize_peak
    }

    /// Write the corrected values back into a form, as a host would refresh its fields.
    pub fn to_form(&self) -> RawFilterForm {
        RawFilterForm {
            window: self.window.to_string(),
            order: self.order.to_string(),
            range_start: Some(self.range_start.to_string()),
            range_end: Some(self.range_end.to_string()),
            normalize: self.normalize_peak,
        }
    }
}

fn parse_int(field: &'static str, value: &str) -> Result<i64, ParameterError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ParameterError::NotInteger {
            field,
            value: value.to_string(),
        })
}

fn parse_bound(field: &'static str, value: Option<&str>) -> Result<Option<f64>, ParameterError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ParameterError::NotNumeric {
                field,
                value: v.to_string(),
            }),
    }
}
