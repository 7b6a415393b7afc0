//! Bilinear rotation of pattern rasters with validity masks.

use crate::image::{ImageView, OwnedImage};
use crate::util::math::sin_cos_deg;

/// Rotates a grayscale pattern raster using bilinear sampling.
///
/// Rotation is performed about the raster center with
/// `cx = (w - 1) / 2` and `cy = (h - 1) / 2` in floating-point coordinates.
/// Each destination pixel center `(x, y)` is mapped back to the source via
/// inverse rotation. The output has the same dimensions as the input; pixels
/// whose source coordinate falls outside the input are filled with `fill` and
/// flagged 0 in the returned mask, all others are flagged 1. The mask drives
/// the weighted scoring so fill pixels never contribute to similarity.
pub fn rotate_bilinear_masked(
    src: ImageView<'_, u8>,
    angle_deg: f32,
    fill: u8,
) -> (OwnedImage, Vec<u8>) {
    let width = src.width();
    let height = src.height();
    let mut out = vec![fill; width * height];
    let mut mask = vec![0u8; width * height];

    let (sin_a, cos_a) = sin_cos_deg(angle_deg);
    let cx = (width as f32 - 1.0) * 0.5;
    let cy = (height as f32 - 1.0) * 0.5;
    let max_x = width as f32 - 1.0;
    let max_y = height as f32 - 1.0;
    let epsilon = 1e-6f32;

    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let src_x = cos_a * dx + sin_a * dy + cx;
            let src_y = -sin_a * dx + cos_a * dy + cy;

            if !src_x.is_finite()
                || !src_y.is_finite()
                || src_x < -epsilon
                || src_y < -epsilon
                || src_x > max_x + epsilon
                || src_y > max_y + epsilon
            {
                continue;
            }

            let src_x = src_x.clamp(0.0, max_x);
            let src_y = src_y.clamp(0.0, max_y);
            let x0 = src_x.floor() as usize;
            let y0 = src_y.floor() as usize;
            let x1 = (x0 + 1).min(width - 1);
            let y1 = (y0 + 1).min(height - 1);
            let fx = src_x - x0 as f32;
            let fy = src_y - y0 as f32;

            let row0 = src.row(y0).expect("row in bounds");
            let row1 = src.row(y1).expect("row in bounds");
            let a = row0[x0] as f32;
            let b = row0[x1] as f32;
            let c = row1[x0] as f32;
            let d = row1[x1] as f32;

            let value = a * (1.0 - fx) * (1.0 - fy)
                + b * fx * (1.0 - fy)
                + c * (1.0 - fx) * fy
                + d * fx * fy;

            let idx = y * width + x;
            out[idx] = value.round().clamp(0.0, 255.0) as u8;
            mask[idx] = 1;
        }
    }

    let img = OwnedImage::new(out, width, height).expect("rotation output is contiguous");
    (img, mask)
}

#[cfg(test)]
mod tests {
    use super::rotate_bilinear_masked;
    use crate::image::ImageView;

    #[test]
    fn zero_rotation_is_identity_with_full_mask() {
        let data: Vec<u8> = (0..20).collect();
        let view = ImageView::from_slice(&data, 5, 4).unwrap();
        let (rotated, mask) = rotate_bilinear_masked(view, 0.0, 0);
        assert_eq!(rotated.data(), data.as_slice());
        assert!(mask.iter().all(|&m| m == 1));
    }

    #[test]
    fn rotation_masks_out_corners() {
        let data = vec![200u8; 11 * 11];
        let view = ImageView::from_slice(&data, 11, 11).unwrap();
        let (_, mask) = rotate_bilinear_masked(view, 45.0, 0);
        assert_eq!(mask[0], 0);
        assert_eq!(mask[10], 0);
        assert_eq!(mask[5 * 11 + 5], 1);
        assert!(mask.iter().any(|&m| m == 0));
    }

    #[test]
    fn rotation_by_90_degrees_permutes_pixels() {
        // Square raster: 90 degrees keeps every sample inside the footprint.
        let data: Vec<u8> = (0..9).collect();
        let view = ImageView::from_slice(&data, 3, 3).unwrap();
        let (rotated, mask) = rotate_bilinear_masked(view, 90.0, 0);
        assert!(mask.iter().all(|&m| m == 1));
        // Center pixel is a fixed point of the rotation.
        assert_eq!(rotated.data()[4], data[4]);
    }
}
