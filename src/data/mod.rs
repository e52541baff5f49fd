/// Data layer: core types and loading.
///
/// Architecture:
/// ```text
///  LA1_Recife.txt  LO.txt  ...   (wavenumber \t transmittance)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SpectrumReading
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ SampleGroup  │  label + reading, one per configured group
///   └──────────────┘
///        │
///        ▼
///   align → AlignedMatrix → projector → Projection
/// ```

pub mod loader;
pub mod model;
