//! Per-level candidate refinement.
//!
//! Each candidate surviving a coarser level is upscaled by two and rescanned
//! over a small placement ROI and the neighboring finer-sweep angles. The
//! merged peaks are thinned by NMS and truncated to the beam width before
//! descending further.

use crate::candidate::nms::suppress_chebyshev;
use crate::candidate::Candidate;
use crate::image::ImageView;
use crate::kernel::{scan_dispatch, ScanParams};
use crate::pattern::RotationBank;
use crate::search::{StageParams, ANGLE_NEIGHBORHOOD_STEPS, MIN_WINDOW_VAR, ROI_RADIUS};
use crate::util::PatMatchResult;

fn roi_bounds(
    x: usize,
    y: usize,
    radius: usize,
    max_x: usize,
    max_y: usize,
) -> Option<(usize, usize, usize, usize)> {
    let x0 = x.saturating_sub(radius);
    let y0 = y.saturating_sub(radius);
    if x0 > max_x || y0 > max_y {
        return None;
    }
    let x1 = x.saturating_add(radius).min(max_x);
    let y1 = y.saturating_add(radius).min(max_y);
    Some((x0, y0, x1, y1))
}

pub(crate) fn refine_to_finer(
    image: ImageView<'_, u8>,
    bank: &RotationBank<'_>,
    prev: &[Candidate],
    stage: StageParams,
) -> PatMatchResult<Vec<Candidate>> {
    if prev.is_empty() {
        return Ok(Vec::new());
    }

    let sweep = bank.sweep();
    let params = ScanParams {
        topk: stage.per_angle_topk,
        min_var_i: MIN_WINDOW_VAR,
        min_score: stage.min_score,
    };

    // The finer plan is twice as large; placements shrink accordingly.
    let tpl_width = bank.plan(sweep.zero_index())?.width();
    let tpl_height = bank.plan(sweep.zero_index())?.height();
    if image.width() < tpl_width || image.height() < tpl_height {
        return Ok(Vec::new());
    }
    let max_x = image.width() - tpl_width;
    let max_y = image.height() - tpl_height;

    let mut all = Vec::new();
    for cand in prev.iter().copied() {
        let x_up = cand.x.saturating_mul(2);
        let y_up = cand.y.saturating_mul(2);
        let Some((x0, y0, x1, y1)) = roi_bounds(x_up, y_up, ROI_RADIUS, max_x, max_y) else {
            continue;
        };

        let half_range = ANGLE_NEIGHBORHOOD_STEPS * sweep.step_deg();
        for angle_idx in sweep.indices_within(cand.angle_deg, half_range) {
            let plan = bank.plan(angle_idx)?;
            all.extend(scan_dispatch(
                stage.use_simd,
                image,
                plan,
                angle_idx,
                bank.angle_at(angle_idx),
                x0,
                y0,
                x1,
                y1,
                params,
            ));
        }
    }

    if all.is_empty() {
        return Ok(Vec::new());
    }

    let mut kept = suppress_chebyshev(&mut all, stage.nms_radius);
    kept.truncate(stage.beam_width);
    Ok(kept)
}
