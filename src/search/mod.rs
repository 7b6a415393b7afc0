//! Coarse-to-fine candidate search.
//!
//! The search walks the pattern pyramid from the coarsest level down: a full
//! rotation-and-translation scan at the top prunes the pose space cheaply,
//! then each finer level rescans small position and angle neighborhoods
//! around the surviving candidates. Level 0 candidates feed the final
//! suppression and refinement stages in the matcher.

pub(crate) mod coarse;
pub(crate) mod refine;

use crate::candidate::Candidate;
use crate::image::pyramid::ImagePyramid;
use crate::image::ImageView;
use crate::matcher::MatchConfig;
use crate::pattern::{Pattern, RotationBank};
use crate::pose::AngleSweep;
use crate::trace::{trace_event, trace_span};
use crate::util::PatMatchResult;

/// Variance floor below which a source window is considered flat.
pub(crate) const MIN_WINDOW_VAR: f32 = 1e-6;

/// Per-level score relaxation: coarse levels accept slightly weaker peaks so
/// pyramid smoothing cannot prune a true occurrence early.
const LEVEL_SCORE_DECAY: f32 = 0.9;

/// Floor for the relaxed coarse threshold. Capped at the configured score so
/// relaxation never tightens a low threshold.
const MIN_LEVEL_SCORE: f32 = 0.2;

/// Tolerances above a half-turn only add duplicate poses.
const MAX_TOLERANCE_DEG: f32 = 180.0;

/// Spatial search radius around an upscaled candidate, in finer-level pixels.
pub(crate) const ROI_RADIUS: usize = 3;

/// Angle neighborhood half-width around a candidate, in finer-sweep steps.
pub(crate) const ANGLE_NEIGHBORHOOD_STEPS: f32 = 2.0;

/// Per-stage scan tuning derived from the match configuration.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StageParams {
    pub use_simd: bool,
    pub per_angle_topk: usize,
    pub min_score: f32,
    pub nms_radius: usize,
    pub beam_width: usize,
}

impl StageParams {
    fn for_level(cfg: &MatchConfig, level: usize, tpl_width: usize, tpl_height: usize) -> Self {
        let floor = MIN_LEVEL_SCORE.min(cfg.score);
        let min_score = (cfg.score * LEVEL_SCORE_DECAY.powi(level as i32)).max(floor);
        Self {
            use_simd: cfg.use_simd,
            per_angle_topk: cfg.max_pos.max(2) * 2,
            min_score,
            nms_radius: (tpl_width.min(tpl_height) / 2).max(1),
            beam_width: cfg.max_pos * 2 + 4,
        }
    }
}

/// Level-0 candidates plus the rotation bank that produced them.
///
/// The bank is handed back so the sub-pixel refiner can rescore candidate
/// neighborhoods without rebuilding rotated plans; candidate `angle_idx`
/// values index into its sweep.
pub(crate) struct SearchOutput<'p> {
    pub(crate) candidates: Vec<Candidate>,
    pub(crate) bank: RotationBank<'p>,
}

/// Runs the coarse-to-fine search and returns level-0 candidates.
///
/// A source smaller than the pattern yields an empty list; "no placement
/// fits" is a legitimate no-match outcome, not an error.
pub(crate) fn find_candidates<'p>(
    pattern: &'p Pattern,
    source: ImageView<'_, u8>,
    cfg: &MatchConfig,
) -> PatMatchResult<SearchOutput<'p>> {
    let base = pattern.level(0).expect("pattern base level exists");
    let tolerance = cfg.tolerance_angle.min(MAX_TOLERANCE_DEG);
    let base_sweep = AngleSweep::for_raster(tolerance, base.width(), base.height())?;

    if source.width() < pattern.width() || source.height() < pattern.height() {
        return Ok(SearchOutput {
            candidates: Vec::new(),
            bank: RotationBank::new(base, base_sweep),
        });
    }

    let depth = pattern.num_levels();
    let _span = trace_span!("candidate_search", levels = depth).entered();

    let source_pyramid = ImagePyramid::build(source, depth)?;
    let depth = depth.min(source_pyramid.num_levels());

    let mut banks = Vec::with_capacity(depth);
    banks.push(RotationBank::new(base, base_sweep));
    for level in 1..depth {
        let raster = pattern.level(level).expect("pattern level exists");
        let sweep = AngleSweep::for_raster(tolerance, raster.width(), raster.height())?;
        banks.push(RotationBank::new(raster, sweep));
    }

    let top = depth - 1;
    let top_raster = pattern.level(top).expect("top level exists");
    let stage = StageParams::for_level(cfg, top, top_raster.width(), top_raster.height());
    let top_image = source_pyramid.level(top).expect("source level exists");
    let mut candidates = coarse::coarse_search(top_image, &banks[top], stage)?;
    trace_event!("coarse_candidates", count = candidates.len());

    for level in (0..top).rev() {
        if candidates.is_empty() {
            break;
        }
        let raster = pattern.level(level).expect("pattern level exists");
        let stage = StageParams::for_level(cfg, level, raster.width(), raster.height());
        let image = source_pyramid.level(level).expect("source level exists");
        candidates = refine::refine_to_finer(image, &banks[level], &candidates, stage)?;
        trace_event!("refined_candidates", level = level, count = candidates.len());
    }

    let bank = banks.into_iter().next().expect("level-0 bank exists");
    Ok(SearchOutput { candidates, bank })
}
