//! Error types for mesh building and configuration loading.

use thiserror::Error;

/// Error produced while bending or stacking a glyph mesh.
///
/// None of these are fatal. Callers keep the last good mesh and try again
/// on the next detected change.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StackError {
    #[error("Source mesh has no glyph vertices")]
    EmptySource,
    #[error("Malformed source mesh: {0}")]
    MalformedSource(String),
    #[error("Combined mesh needs {requested} vertices, limit is {limit}")]
    VertexLimitExceeded { requested: usize, limit: usize },
}

pub type StackResult<T> = Result<T, StackError>;

/// Error produced while reading or writing an effect configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(String),
    #[error("Failed to serialize config: {0}")]
    Serialize(String),
}
