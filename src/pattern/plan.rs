//! Precomputed scoring plans for rotated pattern rasters.

use crate::image::ImageView;
use crate::util::{PatMatchError, PatMatchResult};

/// Precomputed weighted statistics for normalized correlation scoring.
///
/// The plan stores, for one rotated pattern raster, the per-pixel weights
/// (1.0 inside the rotated footprint, 0.0 for fill pixels), the weighted
/// zero-mean template `t_prime = w * (t - mean_w)`, the weight sum and the
/// weighted template variance. The score at a placement is
/// `dot(t_prime, window) / sqrt(var_t * var_i)` with
/// `var_i = sum(w * v^2) - sum(w * v)^2 / sum_w`, which is the masked ZNCC
/// in [-1, 1]. Precomputing this once per angle keeps the per-window work
/// down to three accumulations.
pub struct RotatedPlan {
    width: usize,
    height: usize,
    sum_w: f32,
    var_t: f32,
    t_prime: Vec<f32>,
    weights: Vec<f32>,
}

impl RotatedPlan {
    /// Builds a plan from a rotated raster and its validity mask.
    ///
    /// `mask` must have one entry per pixel; non-zero marks a valid sample.
    pub fn from_view(raster: ImageView<'_, u8>, mask: &[u8]) -> PatMatchResult<Self> {
        let width = raster.width();
        let height = raster.height();
        let count = width
            .checked_mul(height)
            .ok_or(PatMatchError::InvalidDimensions { width, height })?;
        if mask.len() != count {
            return Err(PatMatchError::BufferTooSmall {
                needed: count,
                got: mask.len(),
            });
        }

        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        let mut sum_w = 0.0f64;
        for y in 0..height {
            let row = raster.row(y).expect("raster row in bounds");
            let base = y * width;
            for (x, &value) in row.iter().enumerate() {
                if mask[base + x] == 0 {
                    continue;
                }
                let v = value as f64;
                sum += v;
                sum_sq += v * v;
                sum_w += 1.0;
            }
        }

        if sum_w < 1.0 {
            return Err(PatMatchError::InvalidPattern {
                reason: "empty rotation footprint",
            });
        }
        let mean = sum / sum_w;
        let var_t = sum_sq - sum * sum / sum_w;
        if var_t <= 1e-6 {
            return Err(PatMatchError::InvalidPattern {
                reason: "no intensity variance",
            });
        }

        let mut t_prime = Vec::with_capacity(count);
        let mut weights = Vec::with_capacity(count);
        for y in 0..height {
            let row = raster.row(y).expect("raster row in bounds");
            let base = y * width;
            for (x, &value) in row.iter().enumerate() {
                if mask[base + x] == 0 {
                    t_prime.push(0.0);
                    weights.push(0.0);
                } else {
                    t_prime.push((value as f64 - mean) as f32);
                    weights.push(1.0);
                }
            }
        }

        Ok(Self {
            width,
            height,
            sum_w: sum_w as f32,
            var_t: var_t as f32,
            t_prime,
            weights,
        })
    }

    /// Returns the raster width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the raster height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of valid (weighted) samples.
    pub fn sum_w(&self) -> f32 {
        self.sum_w
    }

    /// Returns the weighted template variance.
    pub fn var_t(&self) -> f32 {
        self.var_t
    }

    /// Returns the weighted zero-mean template in row-major order.
    pub fn t_prime(&self) -> &[f32] {
        &self.t_prime
    }

    /// Returns the per-pixel weights (0.0 or 1.0) in row-major order.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}

#[cfg(test)]
mod tests {
    use super::RotatedPlan;
    use crate::image::ImageView;

    #[test]
    fn plan_rejects_flat_raster() {
        let data = vec![100u8; 16];
        let mask = vec![1u8; 16];
        let view = ImageView::from_slice(&data, 4, 4).unwrap();
        assert!(RotatedPlan::from_view(view, &mask).is_err());
    }

    #[test]
    fn plan_ignores_masked_pixels() {
        // Only the unmasked half contributes to the statistics.
        let data = vec![10u8, 20, 200, 200];
        let mask = vec![1u8, 1, 0, 0];
        let view = ImageView::from_slice(&data, 2, 2).unwrap();
        let plan = RotatedPlan::from_view(view, &mask).unwrap();
        assert_eq!(plan.sum_w(), 2.0);
        // mean = 15, var = (10-15)^2 + (20-15)^2 = 50
        assert!((plan.var_t() - 50.0).abs() < 1e-4);
        assert_eq!(plan.t_prime()[2], 0.0);
        assert_eq!(plan.weights()[3], 0.0);
        assert!((plan.t_prime()[0] + 5.0).abs() < 1e-5);
    }

    #[test]
    fn t_prime_sums_to_zero_over_footprint() {
        let data: Vec<u8> = (0..64).map(|v| (v * 3 % 251) as u8).collect();
        let mask = vec![1u8; 64];
        let view = ImageView::from_slice(&data, 8, 8).unwrap();
        let plan = RotatedPlan::from_view(view, &mask).unwrap();
        let sum: f32 = plan.t_prime().iter().sum();
        assert!(sum.abs() < 1e-3);
    }
}
