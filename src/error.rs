use std::path::PathBuf;
use thiserror::Error;

/// Failures of the analysis pipeline.
///
/// `NoData` is the one non-fatal kind: the input was well formed but nothing
/// matched, and a caller should draw a placeholder rather than abort.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("malformed maze layout: {0}")]
    MalformedMaze(String),
    #[error("invalid log structure: {0}")]
    InvalidLogStructure(String),
    #[error("no data: {0}")]
    NoData(String),
    #[error("insufficient generations: need at least 2 distinct generations, found {found}")]
    InsufficientGenerations { found: usize },
}

impl AnalysisError {
    pub fn is_no_data(&self) -> bool {
        matches!(self, AnalysisError::NoData(_))
    }
}

/// Failures while reading a log or maze document from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Structure(#[from] AnalysisError),
}
