//! Learned pattern model.
//!
//! A `Pattern` is the immutable representation built by the learn operation:
//! a contiguous copy of the template raster plus a pre-built image pyramid
//! used by the coarse-to-fine search. Rotated variants are not stored here;
//! they depend on the per-call angular tolerance and are built lazily by the
//! `RotationBank` during a match.

use crate::image::pyramid::ImagePyramid;
use crate::image::{ImageView, OwnedImage};
use crate::util::{PatMatchError, PatMatchResult};

mod bank;
mod plan;
pub mod rotate;

pub(crate) use bank::RotationBank;
pub use plan::RotatedPlan;

/// Pyramid construction stops once a level drops below this pixel area.
const MIN_REDUCE_AREA: usize = 256;

/// Hard cap on pyramid depth.
const MAX_PYRAMID_LEVELS: usize = 5;

/// Minimum template variance accepted by learning.
const MIN_TEMPLATE_VARIANCE: f64 = 1.0;

/// Immutable learned representation of a template image.
pub struct Pattern {
    levels: Vec<OwnedImage>,
}

impl Pattern {
    /// Learns a pattern from a grayscale template view.
    ///
    /// Fails with `InvalidPattern` when the template has no usable intensity
    /// variance; a flat raster cannot produce meaningful normalized scores.
    pub fn learn(template: ImageView<'_, u8>) -> PatMatchResult<Self> {
        let width = template.width();
        let height = template.height();

        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        for y in 0..height {
            let row = template.row(y).ok_or(PatMatchError::BufferTooSmall {
                needed: (y + 1) * template.stride(),
                got: template.as_slice().len(),
            })?;
            for &value in row {
                let v = value as f64;
                sum += v;
                sum_sq += v * v;
            }
        }
        let count = (width * height) as f64;
        let variance = sum_sq / count - (sum / count) * (sum / count);
        if variance < MIN_TEMPLATE_VARIANCE {
            return Err(PatMatchError::InvalidPattern {
                reason: "no intensity variance",
            });
        }

        let depth = pyramid_depth(width, height);
        let pyramid = ImagePyramid::build(template, depth)?;
        Ok(Self {
            levels: pyramid.into_levels(),
        })
    }

    /// Returns the full-resolution pattern width in pixels.
    pub fn width(&self) -> usize {
        self.levels[0].width()
    }

    /// Returns the full-resolution pattern height in pixels.
    pub fn height(&self) -> usize {
        self.levels[0].height()
    }

    /// Returns the number of pyramid levels (level 0 is full resolution).
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Returns a view of the raster at a pyramid level.
    pub fn level(&self, index: usize) -> Option<ImageView<'_, u8>> {
        self.levels.get(index).map(|img| img.view())
    }
}

/// Chooses how many pyramid levels to build for a template.
///
/// Levels are added while the next one would keep at least `MIN_REDUCE_AREA`
/// pixels and an 8-pixel minimum side, so coarse scores stay discriminative.
fn pyramid_depth(width: usize, height: usize) -> usize {
    let mut depth = 1;
    while depth < MAX_PYRAMID_LEVELS {
        let w = width >> depth;
        let h = height >> depth;
        if w < 8 || h < 8 || w * h < MIN_REDUCE_AREA {
            break;
        }
        depth += 1;
    }
    depth
}
