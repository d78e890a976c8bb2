//! Per-frame tracking pipeline.

use crate::error::TrackError;
use colortrack_core::ColorRange;
use colortrack_mask::preprocess::preprocess;
use colortrack_mask::{ClaheParams, MaskBuilder, MorphologyParams, PreprocessParams};
use colortrack_shapes::{
    analyze_contours, ContourExtractor, ImageprocContourExtractor, ShapeDetection, ShapeParams,
    Trail, DEFAULT_TRAIL_LEN,
};
use image::{GrayImage, RgbImage};
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Which detections a frame keeps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// Only the largest blob.
    #[default]
    Largest,
    /// Every blob above the area threshold, largest first.
    All,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerParams {
    pub preprocess: PreprocessParams,
    pub morphology: MorphologyParams,
    pub shapes: ShapeParams,
    pub selection: Selection,
    pub trail_len: usize,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            preprocess: PreprocessParams {
                blur_sigma: 2.0,
                clahe: Some(ClaheParams::default()),
            },
            morphology: MorphologyParams::default(),
            shapes: ShapeParams::default(),
            selection: Selection::Largest,
            trail_len: DEFAULT_TRAIL_LEN,
        }
    }
}

/// Output of [`ColorTracker::process`] for one frame.
#[derive(Clone, Debug)]
pub struct FrameResult {
    /// Denoised 0/255 mask, frame-sized.
    pub mask: GrayImage,
    /// Largest first.
    pub detections: Vec<ShapeDetection>,
    /// Center of the largest detection.
    pub target: Option<Point2<i32>>,
}

impl FrameResult {
    fn empty(width: u32, height: u32) -> Self {
        Self {
            mask: GrayImage::new(width, height),
            detections: Vec::new(),
            target: None,
        }
    }

    pub fn primary(&self) -> Option<&ShapeDetection> {
        self.detections.first()
    }
}

/// Frame-by-frame color tracker. The only state kept between frames is the
/// trail of recent target centers.
#[derive(Clone, Debug)]
pub struct ColorTracker<E = ImageprocContourExtractor> {
    params: TrackerParams,
    masks: MaskBuilder,
    extractor: E,
    trail: Trail,
}

impl ColorTracker {
    pub fn new(params: TrackerParams) -> Self {
        Self::with_extractor(params, ImageprocContourExtractor)
    }
}

impl Default for ColorTracker {
    fn default() -> Self {
        Self::new(TrackerParams::default())
    }
}

impl<E: ContourExtractor> ColorTracker<E> {
    pub fn with_extractor(params: TrackerParams, extractor: E) -> Self {
        Self {
            masks: MaskBuilder::new(params.morphology.clone()),
            trail: Trail::new(params.trail_len),
            extractor,
            params,
        }
    }

    #[inline]
    pub fn params(&self) -> &TrackerParams {
        &self.params
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn reset(&mut self) {
        self.trail.clear();
    }

    /// Record a frame that could not be processed (a gap in the trail).
    pub fn skip_frame(&mut self) {
        self.trail.push(None);
    }

    /// Run the pipeline on one RGB frame.
    ///
    /// `range = None` tracks nothing: the mask is all zero and the trail
    /// records a gap. Errors (malformed range) leave the trail untouched.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, frame, range),
            fields(width = frame.width(), height = frame.height())
        )
    )]
    pub fn process(
        &mut self,
        frame: &RgbImage,
        range: Option<&ColorRange>,
    ) -> Result<FrameResult, TrackError> {
        let Some(range) = range else {
            self.trail.push(None);
            return Ok(FrameResult::empty(frame.width(), frame.height()));
        };
        range.validate()?;

        let hsv = preprocess(frame, &self.params.preprocess);
        let mask = self.masks.build(&hsv.view(), range)?;
        let contours = self.extractor.extract(&mask);
        let mut detections = analyze_contours(&contours, &self.params.shapes);
        if self.params.selection == Selection::Largest {
            detections.truncate(1);
        }

        let target = detections.first().map(ShapeDetection::center);
        self.trail.push(target);
        debug!(
            "{} contours, {} kept, target {:?}",
            contours.len(),
            detections.len(),
            target.map(|p| (p.x, p.y))
        );

        Ok(FrameResult {
            mask,
            detections,
            target,
        })
    }
}
