use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Spectrum – one loaded trace
// ---------------------------------------------------------------------------

/// A single optical spectrum (one input file).
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Unique name inside its collection (file name, possibly suffixed).
    pub name: String,
    /// Wavelength axis in nm.
    pub wavelength: Vec<f64>,
    /// Intensity in dB – same length as `wavelength`.
    pub intensity: Vec<f64>,
}

impl Spectrum {
    pub fn new(name: impl Into<String>, wavelength: Vec<f64>, intensity: Vec<f64>) -> Self {
        debug_assert_eq!(wavelength.len(), intensity.len());
        Self {
            name: name.into(),
            wavelength,
            intensity,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.wavelength.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelength.is_empty()
    }

    /// `(min, max)` of the wavelength axis; the axis need not be sorted.
    pub fn wavelength_span(&self) -> (f64, f64) {
        let min = self.wavelength.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = self
            .wavelength
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        (min, max)
    }
}

// ---------------------------------------------------------------------------
// SpectrumCollection – ordered, uniquely named spectra
// ---------------------------------------------------------------------------

/// Spectra in load order, addressable by name.
///
/// Insertion order is the batch order. A name that is already taken is
/// renamed to `<name>_(<n>)`, `n` being the collection size at that moment.
#[derive(Debug, Clone, Default)]
pub struct SpectrumCollection {
    spectra: Vec<Spectrum>,
    index: BTreeMap<String, usize>,
}

impl SpectrumCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a spectrum and return the name it was stored under.
    pub fn insert(&mut self, mut spectrum: Spectrum) -> &str {
        if self.index.contains_key(&spectrum.name) {
            let base = spectrum.name.clone();
            let mut n = self.spectra.len();
            let mut candidate = format!("{base}_({n})");
            while self.index.contains_key(&candidate) {
                n += 1;
                candidate = format!("{base}_({n})");
            }
            log::debug!("renamed duplicate spectrum {base:?} to {candidate:?}");
            spectrum.name = candidate;
        }

        let pos = self.spectra.len();
        self.index.insert(spectrum.name.clone(), pos);
        self.spectra.push(spectrum);
        &self.spectra[pos].name
    }

    pub fn get(&self, name: &str) -> Option<&Spectrum> {
        self.index.get(name).map(|&i| &self.spectra[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Remove a spectrum, keeping the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<Spectrum> {
        let pos = self.index.remove(name)?;
        let removed = self.spectra.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.spectra.clear();
        self.index.clear();
    }

    pub fn first(&self) -> Option<&Spectrum> {
        self.spectra.first()
    }

    /// Spectra in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Spectrum> {
        self.spectra.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.spectra.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.spectra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spectra.is_empty()
    }
}

impl<'a> IntoIterator for &'a SpectrumCollection {
    type Item = &'a Spectrum;
    type IntoIter = std::slice::Iter<'a, Spectrum>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace(name: &str) -> Spectrum {
        Spectrum::new(name, vec![1.0, 2.0], vec![-1.0, -2.0])
    }

    #[test]
    fn duplicate_names_get_size_suffix() {
        let mut c = SpectrumCollection::new();
        c.insert(trace("a.txt"));
        c.insert(trace("b.txt"));
        let renamed = c.insert(trace("a.txt")).to_string();
        assert_eq!(renamed, "a.txt_(2)");
        assert_eq!(c.names().collect::<Vec<_>>(), ["a.txt", "b.txt", "a.txt_(2)"]);
    }

    #[test]
    fn suffix_skips_names_already_taken() {
        let mut c = SpectrumCollection::new();
        c.insert(trace("a"));
        c.insert(trace("a_(1)"));
        assert_eq!(c.insert(trace("a")), "a_(2)");
        assert_eq!(c.insert(trace("a")), "a_(3)");
    }

    #[test]
    fn remove_keeps_order_and_index() {
        let mut c = SpectrumCollection::new();
        for n in ["x", "y", "z"] {
            c.insert(trace(n));
        }
        assert!(c.remove("x").is_some());
        assert_eq!(c.names().collect::<Vec<_>>(), ["y", "z"]);
        assert_eq!(c.get("z").map(|s| s.name.as_str()), Some("z"));
        assert!(c.remove("x").is_none());
    }

    #[test]
    fn span_of_unsorted_axis() {
        let s = Spectrum::new("s", vec![1551.0, 1549.0, 1550.0], vec![0.0; 3]);
        assert_eq!(s.wavelength_span(), (1549.0, 1551.0));
    }
}
