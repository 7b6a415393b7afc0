//! Similarity scoring kernels.
//!
//! A kernel computes the masked ZNCC between a rotated pattern plan and a
//! pattern-sized window of the source image. The scalar and SIMD kernels
//! evaluate the same formula; `use_simd` in the match configuration selects
//! the execution strategy at runtime and must not change results beyond
//! floating-point tolerance.

use crate::candidate::topk::TopK;
use crate::candidate::Candidate;
use crate::image::ImageView;
use crate::pattern::RotatedPlan;

pub(crate) mod scalar;
pub(crate) mod simd;

#[cfg(feature = "rayon")]
pub(crate) mod rayon;

/// Scan configuration for kernel evaluations.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ScanParams {
    /// Maximum number of peaks to retain per angle.
    pub topk: usize,
    /// Minimum variance accepted for a source window.
    pub min_var_i: f32,
    /// Minimum score threshold (discard below this value).
    pub min_score: f32,
}

/// Single-placement scoring strategy.
pub(crate) trait Kernel {
    /// Computes the masked ZNCC at a placement (top-left coordinates).
    ///
    /// Returns `f32::NEG_INFINITY` for out-of-bounds placements and windows
    /// without usable variance.
    fn score_at(
        image: ImageView<'_, u8>,
        plan: &RotatedPlan,
        x: usize,
        y: usize,
        min_var_i: f32,
    ) -> f32;
}

/// Scores a placement with the configured strategy.
pub(crate) fn score_at(
    use_simd: bool,
    image: ImageView<'_, u8>,
    plan: &RotatedPlan,
    x: usize,
    y: usize,
    min_var_i: f32,
) -> f32 {
    if use_simd {
        simd::SimdKernel::score_at(image, plan, x, y, min_var_i)
    } else {
        scalar::ScalarKernel::score_at(image, plan, x, y, min_var_i)
    }
}

/// Scans placements in `[x0, x1] x [y0, y1]` and returns top-K candidates.
///
/// The range is clamped to the valid placement area; an image smaller than
/// the plan yields no candidates rather than an error, since "pattern does
/// not fit" is a legitimate empty outcome.
#[allow(clippy::too_many_arguments)]
pub(crate) fn scan_range<K: Kernel>(
    image: ImageView<'_, u8>,
    plan: &RotatedPlan,
    angle_idx: usize,
    angle_deg: f32,
    x0: usize,
    y0: usize,
    mut x1: usize,
    mut y1: usize,
    params: ScanParams,
) -> Vec<Candidate> {
    if params.topk == 0 {
        return Vec::new();
    }

    let img_width = image.width();
    let img_height = image.height();
    let tpl_width = plan.width();
    let tpl_height = plan.height();
    if img_width < tpl_width || img_height < tpl_height {
        return Vec::new();
    }

    let max_x = img_width - tpl_width;
    let max_y = img_height - tpl_height;
    if x0 > max_x || y0 > max_y {
        return Vec::new();
    }
    x1 = x1.min(max_x);
    y1 = y1.min(max_y);
    if x0 > x1 || y0 > y1 {
        return Vec::new();
    }

    let mut topk = TopK::new(params.topk);
    for y in y0..=y1 {
        for x in x0..=x1 {
            let score = K::score_at(image, plan, x, y, params.min_var_i);
            if score.is_finite() && score >= params.min_score {
                topk.push(Candidate {
                    x,
                    y,
                    score,
                    angle_idx,
                    angle_deg,
                });
            }
        }
    }
    topk.into_sorted()
}

/// Scans the full valid placement range with the configured strategy.
pub(crate) fn scan_full(
    use_simd: bool,
    image: ImageView<'_, u8>,
    plan: &RotatedPlan,
    angle_idx: usize,
    angle_deg: f32,
    params: ScanParams,
) -> Vec<Candidate> {
    scan_dispatch(
        use_simd,
        image,
        plan,
        angle_idx,
        angle_deg,
        0,
        0,
        usize::MAX,
        usize::MAX,
        params,
    )
}

/// Scans an ROI of placement coordinates with the configured strategy.
#[allow(clippy::too_many_arguments)]
pub(crate) fn scan_dispatch(
    use_simd: bool,
    image: ImageView<'_, u8>,
    plan: &RotatedPlan,
    angle_idx: usize,
    angle_deg: f32,
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
    params: ScanParams,
) -> Vec<Candidate> {
    if use_simd {
        scan_range::<simd::SimdKernel>(image, plan, angle_idx, angle_deg, x0, y0, x1, y1, params)
    } else {
        scan_range::<scalar::ScalarKernel>(image, plan, angle_idx, angle_deg, x0, y0, x1, y1, params)
    }
}
