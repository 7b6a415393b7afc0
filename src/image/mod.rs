//! Image views and owned grayscale buffers.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. The matching core
//! operates exclusively on these views; decoding pixel data from files is the
//! caller's concern.

use crate::util::{PatMatchError, PatMatchResult};

pub mod pyramid;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> PatMatchResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> PatMatchResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(PatMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> PatMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(PatMatchError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(PatMatchError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(PatMatchError::InvalidDimensions { width, height })
}

/// Owned contiguous grayscale image buffer.
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Creates an owned image from a contiguous buffer.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> PatMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(PatMatchError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(PatMatchError::InvalidDimensions { width, height })?;
        if data.len() != needed {
            return Err(PatMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Copies a borrowed view into a contiguous owned image.
    pub fn from_view(view: ImageView<'_, u8>) -> PatMatchResult<Self> {
        let width = view.width();
        let height = view.height();
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            let row = view.row(y).ok_or(PatMatchError::BufferTooSmall {
                needed: (y + 1) * view.stride(),
                got: view.as_slice().len(),
            })?;
            data.extend_from_slice(row);
        }
        Self::new(data, width, height)
    }

    /// Copies a borrowed view into an owned image with inverted intensities.
    ///
    /// Each pixel becomes `255 - v`, turning a dark-on-light source into a
    /// light-on-dark one before matching.
    pub fn from_view_inverted(view: ImageView<'_, u8>) -> PatMatchResult<Self> {
        let width = view.width();
        let height = view.height();
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            let row = view.row(y).ok_or(PatMatchError::BufferTooSmall {
                needed: (y + 1) * view.stride(),
                got: view.as_slice().len(),
            })?;
            data.extend(row.iter().map(|&v| 255 - v));
        }
        Self::new(data, width, height)
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the raw pixel data in row-major order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ImageView, OwnedImage};
    use crate::util::PatMatchError;

    #[test]
    fn view_rejects_invalid_dimensions() {
        let data = [0u8; 4];
        let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
        assert_eq!(
            err,
            PatMatchError::InvalidDimensions {
                width: 0,
                height: 1
            }
        );
    }

    #[test]
    fn view_rejects_invalid_stride() {
        let data = [0u8; 8];
        let err = ImageView::new(&data, 4, 1, 3).err().unwrap();
        assert_eq!(
            err,
            PatMatchError::InvalidStride {
                width: 4,
                stride: 3
            }
        );
    }

    #[test]
    fn view_rejects_small_buffer() {
        let data = [0u8; 3];
        let err = ImageView::new(&data, 2, 2, 2).err().unwrap();
        assert_eq!(err, PatMatchError::BufferTooSmall { needed: 4, got: 3 });
    }

    #[test]
    fn strided_view_reads_rows_without_padding() {
        // 3x2 image with stride 4: one padding byte per row.
        let data = [1u8, 2, 3, 99, 4, 5, 6, 99];
        let view = ImageView::new(&data, 3, 2, 4).unwrap();
        assert_eq!(view.row(0).unwrap(), &[1, 2, 3]);
        assert_eq!(view.row(1).unwrap(), &[4, 5, 6]);
        assert_eq!(*view.get(2, 1).unwrap(), 6);
        assert!(view.get(3, 0).is_none());
    }

    #[test]
    fn owned_from_strided_view_is_contiguous() {
        let data = [1u8, 2, 3, 99, 4, 5, 6, 99];
        let view = ImageView::new(&data, 3, 2, 4).unwrap();
        let owned = OwnedImage::from_view(view).unwrap();
        assert_eq!(owned.data(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn inverted_copy_flips_intensities() {
        let data = [0u8, 255, 100, 155];
        let view = ImageView::from_slice(&data, 2, 2).unwrap();
        let inverted = OwnedImage::from_view_inverted(view).unwrap();
        assert_eq!(inverted.data(), &[255, 0, 155, 100]);
    }
}
