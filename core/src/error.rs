use thiserror::Error;

pub type TerrainResult<T> = Result<T, TerrainError>;

// Failures raised before any sampling or meshing work starts
#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("invalid configuration: {reason}")]
    Configuration { reason: String },

    #[error("insufficient resolution: need at least 2x2 samples to triangulate, got {width}x{height}")]
    InsufficientResolution { width: usize, height: usize },
}

impl TerrainError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}
