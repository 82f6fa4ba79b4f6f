//! Error type shared by the generators, the scheduler and the engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MorphError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),
    #[error("raster buffer size mismatch: expected {expected} pixels, got {actual}")]
    RasterSize { expected: usize, actual: usize },
    #[error("text rasterization failed: {0}")]
    Raster(String),
    #[error("config parse error: {0}")]
    Config(String),
}
