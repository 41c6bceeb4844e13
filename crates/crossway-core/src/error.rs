//! Error types for Crossway

use thiserror::Error;

/// The main error type for Crossway operations
#[derive(Debug, Error)]
pub enum CrosswayError {
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Mesh parse error: {0}")]
    MeshParseError(String),

    #[error("Snapshot error: {0}")]
    SnapshotError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for Crossway operations
pub type Result<T> = std::result::Result<T, CrosswayError>;
