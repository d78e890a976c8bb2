use crate::error::TrackError;
use image::{ImageReader, RgbImage};
use std::path::{Path, PathBuf};

/// One decoded RGB frame.
#[derive(Clone, Debug)]
pub struct Frame {
    pub index: usize,
    /// File the frame came from, if any.
    pub path: Option<PathBuf>,
    pub image: RgbImage,
}

/// Produces frames one at a time, in order.
///
/// `None` means the source is exhausted. A failed frame is reported as
/// `Some(Err(..))` and the source moves on, so callers may skip it.
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<Result<Frame, TrackError>>;

    /// Frames left, when known.
    fn remaining(&self) -> Option<usize> {
        None
    }
}

/// Frames read from a list of image files.
#[derive(Clone, Debug, Default)]
pub struct ImageSequence {
    paths: Vec<PathBuf>,
    next: usize,
}

impl ImageSequence {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            next: 0,
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl FrameSource for ImageSequence {
    fn next_frame(&mut self) -> Option<Result<Frame, TrackError>> {
        let path = self.paths.get(self.next)?.clone();
        let index = self.next;
        self.next += 1;
        Some(read_rgb(&path).map(|image| Frame {
            index,
            path: Some(path),
            image,
        }))
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.paths.len() - self.next)
    }
}

/// Decode an image file into RGB8.
pub(crate) fn read_rgb(path: &Path) -> Result<RgbImage, TrackError> {
    let frame_error = |source| TrackError::Frame {
        path: path.to_path_buf(),
        source,
    };
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    Ok(reader.decode().map_err(frame_error)?.to_rgb8())
}
