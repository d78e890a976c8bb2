use colortrack_core::InvalidArgument;
use std::path::PathBuf;

/// Errors produced by the tracker, frame sources and I/O helpers.
#[derive(thiserror::Error, Debug)]
pub enum TrackError {
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),

    #[error("failed to read frame {path}: {source}")]
    Frame {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
