//! Compare FTIR sample groups by PCA.
//!
//! Spectra recorded on different wavenumber grids are aligned into one
//! matrix, reduced to two principal components and drawn as a labelled
//! scatter chart.

pub mod align;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod projector;
pub mod render;

pub use align::AlignmentStrategy;
pub use config::{GroupSource, PipelineConfig};
pub use data::model::{AlignedMatrix, Projection, SampleGroup, SpectrumReading};
pub use error::{PipelineError, Result};
