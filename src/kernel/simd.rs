//! SIMD kernel for masked ZNCC scoring using the `wide` crate.
//!
//! The inner pattern-row loop processes 8 pixels per step with `f32x8`.
//! Masked pixels carry weight 0.0 and a zero `t_prime` entry, so the
//! weighted accumulation needs no branches and evaluates the same formula
//! as the scalar kernel.

use crate::image::ImageView;
use crate::kernel::Kernel;
use crate::pattern::RotatedPlan;
use wide::f32x8;

const LANES: usize = 8;

/// Load 8 u8 values and convert to f32x8.
#[inline]
fn load_u8x8_as_f32x8(slice: &[u8]) -> f32x8 {
    f32x8::from([
        slice[0] as f32,
        slice[1] as f32,
        slice[2] as f32,
        slice[3] as f32,
        slice[4] as f32,
        slice[5] as f32,
        slice[6] as f32,
        slice[7] as f32,
    ])
}

/// Load 8 f32 values into f32x8.
#[inline]
fn load_f32x8(slice: &[f32]) -> f32x8 {
    f32x8::from([
        slice[0], slice[1], slice[2], slice[3], slice[4], slice[5], slice[6], slice[7],
    ])
}

/// Horizontal sum of f32x8.
#[inline]
fn hsum(v: f32x8) -> f32 {
    let arr = v.to_array();
    arr[0] + arr[1] + arr[2] + arr[3] + arr[4] + arr[5] + arr[6] + arr[7]
}

/// Vectorized kernel; numerically equivalent to `ScalarKernel` within
/// floating-point reassociation tolerance.
pub(crate) struct SimdKernel;

impl Kernel for SimdKernel {
    fn score_at(
        image: ImageView<'_, u8>,
        plan: &RotatedPlan,
        x: usize,
        y: usize,
        min_var_i: f32,
    ) -> f32 {
        let img_width = image.width();
        let img_height = image.height();
        let tpl_width = plan.width();
        let tpl_height = plan.height();

        if img_width < tpl_width || img_height < tpl_height {
            return f32::NEG_INFINITY;
        }
        if x > img_width - tpl_width || y > img_height - tpl_height {
            return f32::NEG_INFINITY;
        }

        let var_t = plan.var_t();
        if var_t <= 1e-8 {
            return f32::NEG_INFINITY;
        }
        let sum_w = plan.sum_w();
        let t_prime = plan.t_prime();
        let weights = plan.weights();

        let mut dot_vec = f32x8::ZERO;
        let mut sum_i_vec = f32x8::ZERO;
        let mut sum_i2_vec = f32x8::ZERO;

        let mut dot_s = 0.0f32;
        let mut sum_i_s = 0.0f32;
        let mut sum_i2_s = 0.0f32;

        let simd_end = tpl_width / LANES * LANES;

        for ty in 0..tpl_height {
            let img_row = match image.row(y + ty) {
                Some(row) => row,
                None => return f32::NEG_INFINITY,
            };
            let base = ty * tpl_width;

            // SIMD portion: 8 pixels per step.
            let mut tx = 0;
            while tx < simd_end {
                let img_vals = load_u8x8_as_f32x8(&img_row[x + tx..]);
                let tpl_vals = load_f32x8(&t_prime[base + tx..]);
                let w_vals = load_f32x8(&weights[base + tx..]);

                let weighted = w_vals * img_vals;
                dot_vec += tpl_vals * img_vals;
                sum_i_vec += weighted;
                sum_i2_vec += weighted * img_vals;

                tx += LANES;
            }

            // Scalar remainder.
            while tx < tpl_width {
                let idx = base + tx;
                let value = img_row[x + tx] as f32;
                let w = weights[idx];
                dot_s += t_prime[idx] * value;
                sum_i_s += w * value;
                sum_i2_s += w * value * value;
                tx += 1;
            }
        }

        let dot = hsum(dot_vec) + dot_s;
        let sum_i = hsum(sum_i_vec) + sum_i_s;
        let sum_i2 = hsum(sum_i2_vec) + sum_i2_s;

        let var_i = sum_i2 - (sum_i * sum_i) / sum_w;
        if var_i <= min_var_i {
            return f32::NEG_INFINITY;
        }

        let score = dot / (var_t * var_i).sqrt();
        if score.is_finite() {
            score
        } else {
            f32::NEG_INFINITY
        }
    }
}
