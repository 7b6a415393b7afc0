//! Image pyramid construction for grayscale `u8` images.
//!
//! Downsampling uses a 2x2 box filter with integer rounding:
//! `dst = ((a + b + c + d) + 2) / 4`. Deterministic by construction, so
//! coarse-level scores are reproducible across runs and thread counts.

use crate::image::{ImageView, OwnedImage};
use crate::util::{PatMatchError, PatMatchResult};

/// Owned image pyramid built from a base level.
pub struct ImagePyramid {
    levels: Vec<OwnedImage>,
}

impl ImagePyramid {
    /// Builds a pyramid from a base grayscale view.
    ///
    /// `max_levels` is clamped to at least 1 so the base level is always
    /// present. Construction stops early once a level becomes too small to
    /// halve again.
    pub fn build(base: ImageView<'_, u8>, max_levels: usize) -> PatMatchResult<Self> {
        let max_levels = max_levels.max(1);
        let mut levels = Vec::new();
        levels.push(OwnedImage::from_view(base)?);

        while levels.len() < max_levels {
            let prev = levels.last().expect("levels is not empty");
            let src = prev.view();
            if src.width() < 2 || src.height() < 2 {
                break;
            }
            levels.push(downsample_2x2(src)?);
        }

        Ok(Self { levels })
    }

    /// Returns the number of levels (level 0 is the base resolution).
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Returns a view for a specific pyramid level.
    pub fn level(&self, index: usize) -> Option<ImageView<'_, u8>> {
        self.levels.get(index).map(|img| img.view())
    }

    /// Consumes the pyramid and returns its levels.
    pub(crate) fn into_levels(self) -> Vec<OwnedImage> {
        self.levels
    }
}

fn downsample_2x2(src: ImageView<'_, u8>) -> PatMatchResult<OwnedImage> {
    let dst_width = src.width() / 2;
    let dst_height = src.height() / 2;
    let dst_len = dst_width
        .checked_mul(dst_height)
        .ok_or(PatMatchError::InvalidDimensions {
            width: dst_width,
            height: dst_height,
        })?;
    let mut dst = vec![0u8; dst_len];

    for y in 0..dst_height {
        let row0 = src.row(y * 2).expect("source row in bounds");
        let row1 = src.row(y * 2 + 1).expect("source row in bounds");
        for x in 0..dst_width {
            let sum = u16::from(row0[2 * x])
                + u16::from(row0[2 * x + 1])
                + u16::from(row1[2 * x])
                + u16::from(row1[2 * x + 1]);
            dst[y * dst_width + x] = ((sum + 2) / 4) as u8;
        }
    }

    OwnedImage::new(dst, dst_width, dst_height)
}

#[cfg(test)]
mod tests {
    use super::ImagePyramid;
    use crate::image::ImageView;

    #[test]
    fn pyramid_halves_dimensions_per_level() {
        let data = vec![128u8; 64 * 48];
        let view = ImageView::from_slice(&data, 64, 48).unwrap();
        let pyr = ImagePyramid::build(view, 4).unwrap();
        assert_eq!(pyr.num_levels(), 4);
        let l2 = pyr.level(2).unwrap();
        assert_eq!((l2.width(), l2.height()), (16, 12));
    }

    #[test]
    fn pyramid_stops_when_too_small() {
        let data = vec![0u8; 3 * 3];
        let view = ImageView::from_slice(&data, 3, 3).unwrap();
        let pyr = ImagePyramid::build(view, 8).unwrap();
        assert_eq!(pyr.num_levels(), 2);
        let top = pyr.level(1).unwrap();
        assert_eq!((top.width(), top.height()), (1, 1));
    }

    #[test]
    fn box_filter_averages_with_rounding() {
        let data = vec![0u8, 10, 20, 30];
        let view = ImageView::from_slice(&data, 2, 2).unwrap();
        let pyr = ImagePyramid::build(view, 2).unwrap();
        let top = pyr.level(1).unwrap();
        // (0 + 10 + 20 + 30 + 2) / 4 = 15
        assert_eq!(*top.get(0, 0).unwrap(), 15);
    }
}
