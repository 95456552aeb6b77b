/// Data layer: core types, loading, grid alignment and differencing.
///
/// Architecture:
/// ```text
///  table .csv            DOS triplets
///        │                    │
///        ▼                    ▼
///   ┌──────────┐        ┌──────────┐
///   │  loader   │        │  loader   │  parse text → Table / DosSpectrum
///   └──────────┘        └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  align    │  force each Series onto the pressure grid
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  diff     │  subtract the baseline compound row by row
///   └──────────┘
/// ```

pub mod align;
pub mod diff;
pub mod loader;
pub mod model;
