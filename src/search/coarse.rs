//! Full scan at the coarsest pyramid level.
//!
//! Every sweep angle is scanned over the full placement range, per-angle
//! peaks are merged, thinned by spatial NMS and truncated to the beam width.
//! With the `rayon` feature the per-angle scans run in parallel; the merge
//! and sort stay deterministic either way.

use crate::candidate::nms::suppress_chebyshev;
use crate::candidate::Candidate;
use crate::image::ImageView;
#[cfg(feature = "rayon")]
use crate::kernel::rayon::scan_angles_par;
#[cfg(not(feature = "rayon"))]
use crate::kernel::scan_full;
use crate::kernel::ScanParams;
use crate::pattern::RotationBank;
use crate::search::{StageParams, MIN_WINDOW_VAR};
use crate::trace::trace_span;
use crate::util::PatMatchResult;

pub(crate) fn coarse_search(
    image: ImageView<'_, u8>,
    bank: &RotationBank<'_>,
    stage: StageParams,
) -> PatMatchResult<Vec<Candidate>> {
    let _span = trace_span!("coarse_search", angles = bank.sweep().len()).entered();

    let params = ScanParams {
        topk: stage.per_angle_topk,
        min_var_i: MIN_WINDOW_VAR,
        min_score: stage.min_score,
    };

    let mut all = scan_angles(image, bank, stage.use_simd, params)?;
    if all.is_empty() {
        return Ok(Vec::new());
    }

    let mut kept = suppress_chebyshev(&mut all, stage.nms_radius);
    kept.truncate(stage.beam_width);
    Ok(kept)
}

#[cfg(feature = "rayon")]
fn scan_angles(
    image: ImageView<'_, u8>,
    bank: &RotationBank<'_>,
    use_simd: bool,
    params: ScanParams,
) -> PatMatchResult<Vec<Candidate>> {
    scan_angles_par(image, bank, use_simd, params)
}

#[cfg(not(feature = "rayon"))]
fn scan_angles(
    image: ImageView<'_, u8>,
    bank: &RotationBank<'_>,
    use_simd: bool,
    params: ScanParams,
) -> PatMatchResult<Vec<Candidate>> {
    let mut all = Vec::new();
    for angle_idx in 0..bank.sweep().len() {
        let plan = bank.plan(angle_idx)?;
        all.extend(scan_full(
            use_simd,
            image,
            plan,
            angle_idx,
            bank.angle_at(angle_idx),
            params,
        ));
    }
    Ok(all)
}
