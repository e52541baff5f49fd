/// Alignment: turn labelled readings into a rectangular PCA input.
///
/// ```text
///   Vec<SampleGroup>
///        │
///        ├── pivot       one row per group, one column per wavenumber  (default)
///        └── positional  one column per group, rows matched by position (legacy)
///        │
///        ▼
///   AlignedMatrix
/// ```
pub mod fill;
pub mod pivot;
pub mod positional;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::model::{AlignedMatrix, SampleGroup};
use crate::error::Result;

pub use pivot::align_pivot;
pub use positional::align_positional;

/// How readings recorded on different grids are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentStrategy {
    /// Merge on wavenumber value; each group is one observation.
    #[default]
    Pivot,
    /// Stack transmittance columns by list position; labels are approximate.
    Positional,
}

impl AlignmentStrategy {
    pub fn align(self, groups: &[SampleGroup]) -> Result<AlignedMatrix> {
        match self {
            AlignmentStrategy::Pivot => align_pivot(groups),
            AlignmentStrategy::Positional => align_positional(groups),
        }
    }

    /// Chart title used when the configuration does not set one.
    pub fn default_title(self) -> &'static str {
        match self {
            AlignmentStrategy::Pivot => "PCA of FTIR Data (All Samples)",
            AlignmentStrategy::Positional => "PCA of FTIR Data",
        }
    }
}

impl fmt::Display for AlignmentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignmentStrategy::Pivot => write!(f, "pivot"),
            AlignmentStrategy::Positional => write!(f, "positional"),
        }
    }
}
