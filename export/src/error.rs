use std::path::PathBuf;

use heightfield::TerrainError;
use thiserror::Error;

use crate::ExportTarget;

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Error)]
pub enum ExportError {
    // Could not create, write or flush the output file
    #[error("failed to write {target} to {}: {source}", .path.display())]
    Io {
        target: ExportTarget,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // The encoder rejected the format or failed while writing
    #[error("failed to encode {target} to {}: {source}", .path.display())]
    Image {
        target: ExportTarget,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    // Raised while reading a file back
    #[error("invalid {format} content: {message}")]
    InvalidContent {
        format: &'static str,
        message: String,
    },

    #[error(transparent)]
    Terrain(#[from] TerrainError),
}

impl ExportError {
    pub fn io(target: ExportTarget, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            target,
            path: path.into(),
            source,
        }
    }

    pub fn image(target: ExportTarget, path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Image {
            target,
            path: path.into(),
            source,
        }
    }

    pub fn invalid_content(format: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidContent {
            format,
            message: message.into(),
        }
    }
}
