use std::path::PathBuf;

use thiserror::Error;

/// Result type used across the pipeline stages.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Every failure the pipeline can surface. All of them are fatal for the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// An input path named in the configuration does not exist.
    #[error("input file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// A line of an input file is not two numeric fields.
    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Missing or unfillable data during alignment.
    #[error("data error: {0}")]
    Data(String),

    /// The aligned matrix is too small to extract two components.
    #[error("cannot extract 2 components from a {rows}x{cols} matrix")]
    Dimension { rows: usize, cols: usize },

    /// Inconsistent configuration (labels, colours).
    #[error("configuration error: {0}")]
    Config(String),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("render error: {0}")]
    Render(String),
}

impl PipelineError {
    /// Short name of the stage the error belongs to, for user-facing reports.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::NotFound { .. } | PipelineError::Parse { .. } | PipelineError::Io { .. } => {
                "load"
            }
            PipelineError::Data(_) => "align",
            PipelineError::Dimension { .. } => "project",
            PipelineError::Config(_) => "config",
            PipelineError::Render(_) => "render",
        }
    }
}
