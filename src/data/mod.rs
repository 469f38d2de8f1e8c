/// Data layer: spectrum types and text-file loading.
///
/// Architecture:
/// ```text
///  .txt (two or more numeric columns)
///        │
///        ▼
///   ┌───────────┐
///   │ delimiter │  first line → ';' | ',' | whitespace
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Spectrum
///   └──────────┘
///        │
///        ▼
///   ┌────────────────────┐
///   │ SpectrumCollection │  ordered, uniquely named spectra
///   └────────────────────┘
/// ```

pub mod delimiter;
pub mod loader;
pub mod model;
