//! Rayon-parallel scan helpers (feature-gated).
//!
//! Candidate search parallelizes across sweep angles: each worker scans the
//! full placement range for one rotated plan. Inputs are read-only and the
//! per-angle results are merged and re-sorted deterministically, so the
//! final ordering does not depend on thread scheduling.

use crate::candidate::Candidate;
use crate::image::ImageView;
use crate::kernel::{scan_full, ScanParams};
use crate::pattern::RotationBank;
use crate::util::PatMatchResult;
use rayon::prelude::*;

/// Scans all sweep angles in parallel and merges the per-angle peaks.
pub(crate) fn scan_angles_par(
    image: ImageView<'_, u8>,
    bank: &RotationBank<'_>,
    use_simd: bool,
    params: ScanParams,
) -> PatMatchResult<Vec<Candidate>> {
    let results: Vec<PatMatchResult<Vec<Candidate>>> = (0..bank.sweep().len())
        .into_par_iter()
        .map(|angle_idx| {
            let plan = bank.plan(angle_idx)?;
            Ok(scan_full(
                use_simd,
                image,
                plan,
                angle_idx,
                bank.angle_at(angle_idx),
                params,
            ))
        })
        .collect();

    let mut all = Vec::new();
    for result in results {
        all.extend(result?);
    }
    Ok(all)
}
