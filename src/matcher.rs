//! Matcher facade, configuration and result types.
//!
//! The facade owns the one learned pattern and drives the full pipeline:
//! config validation, coarse-to-fine candidate search, footprint suppression,
//! sub-pixel refinement and result assembly. A matcher instance is reusable
//! indefinitely; `learn` takes `&mut self` and `match_image` takes `&self`,
//! so single-writer multiple-reader discipline is enforced by the borrow
//! checker rather than internal locking. Distinct instances are independent.

use crate::candidate::nms::suppress_overlap;
use crate::candidate::Candidate;
use crate::image::{ImageView, OwnedImage};
use crate::kernel;
use crate::pattern::{Pattern, RotationBank};
use crate::refine::{parabolic_peak_offset, refine_subpixel_2d};
use crate::search::{self, MIN_WINDOW_VAR};
use crate::trace::{trace_event, trace_span};
use crate::util::math::sin_cos_deg;
use crate::util::{PatMatchError, PatMatchResult};
use std::time::Instant;

/// Per-call match configuration.
#[derive(Clone, Debug)]
pub struct MatchConfig {
    /// Maximum number of distinct matches to return (at least 1).
    pub max_pos: usize,
    /// Minimum acceptable similarity in [0, 1].
    pub score: f32,
    /// Half-width of the rotation search range in degrees, non-negative;
    /// the sweep covers `[-tolerance_angle, +tolerance_angle]`. Values above
    /// 180 are clamped to a full half-turn.
    pub tolerance_angle: f32,
    /// Maximum allowed footprint overlap fraction between accepted matches,
    /// in [0, 1); 0 means any overlap suppresses.
    pub max_overlap: f32,
    /// Selects the vectorized scoring path; results stay within
    /// floating-point tolerance of the scalar path.
    pub use_simd: bool,
    /// Enables parabolic sub-pixel and sub-angle peak refinement.
    pub sub_pixel_estimation: bool,
    /// Inverts source intensities (`255 - v`) before matching, for locating
    /// a pattern of opposite polarity.
    pub bitwise_not: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_pos: 1,
            score: 0.5,
            tolerance_angle: 0.0,
            max_overlap: 0.0,
            use_simd: true,
            sub_pixel_estimation: true,
            bitwise_not: false,
        }
    }
}

impl MatchConfig {
    fn validate(&self) -> PatMatchResult<()> {
        if self.max_pos == 0 {
            return Err(PatMatchError::InvalidConfig {
                reason: "max_pos must be at least 1",
            });
        }
        if !self.score.is_finite() || !(0.0..=1.0).contains(&self.score) {
            return Err(PatMatchError::InvalidConfig {
                reason: "score must lie in [0, 1]",
            });
        }
        if !self.tolerance_angle.is_finite() || self.tolerance_angle < 0.0 {
            return Err(PatMatchError::InvalidConfig {
                reason: "tolerance_angle must be finite and non-negative",
            });
        }
        if !self.max_overlap.is_finite() || !(0.0..1.0).contains(&self.max_overlap) {
            return Err(PatMatchError::InvalidConfig {
                reason: "max_overlap must lie in [0, 1)",
            });
        }
        Ok(())
    }
}

/// 2D point in source-image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// Horizontal coordinate (column).
    pub x: f32,
    /// Vertical coordinate (row).
    pub y: f32,
}

/// Finalized, ranked detection.
#[derive(Clone, Copy, Debug)]
pub struct Match {
    /// Similarity score in [0, 1].
    pub score: f32,
    /// Estimated rotation angle in degrees.
    pub angle_deg: f32,
    /// Pattern center, sub-pixel when refinement is enabled.
    pub center: Point,
    /// Rotated pattern extent: top-left, top-right, bottom-right,
    /// bottom-left corners of the pattern rectangle at the matched pose.
    pub corners: [Point; 4],
}

/// Result of one match invocation.
#[derive(Clone, Debug)]
pub struct MatchResult {
    /// Accepted matches, best-first.
    pub matches: Vec<Match>,
    /// True iff at least one match survived thresholding.
    pub success: bool,
    /// Wall-clock execution time in milliseconds.
    pub elapsed_ms: f64,
}

/// Pattern matcher facade with learn/match operations.
///
/// State machine: `Unlearned` until the first successful `learn`, then
/// `Learned` forever after; matching never consumes the pattern and a failed
/// learn keeps the previous one.
#[derive(Default)]
pub struct Matcher {
    pattern: Option<Pattern>,
}

impl Matcher {
    /// Creates a matcher with no learned pattern.
    pub fn new() -> Self {
        Self::default()
    }

    /// Learns a new pattern, replacing the current one on success.
    pub fn learn(&mut self, template: ImageView<'_, u8>) -> PatMatchResult<()> {
        let pattern = Pattern::learn(template)?;
        self.pattern = Some(pattern);
        Ok(())
    }

    /// Returns true once a pattern has been learned.
    pub fn is_learned(&self) -> bool {
        self.pattern.is_some()
    }

    /// Returns the current learned pattern, if any.
    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    /// Searches the source image for occurrences of the learned pattern.
    ///
    /// "No match found" is a `success == false` result with an empty match
    /// list; errors are reserved for structural problems (unlearned state,
    /// invalid configuration).
    pub fn match_image(
        &self,
        source: ImageView<'_, u8>,
        cfg: &MatchConfig,
    ) -> PatMatchResult<MatchResult> {
        cfg.validate()?;
        let pattern = self.pattern.as_ref().ok_or(PatMatchError::NotLearned)?;

        let start = Instant::now();
        let _span = trace_span!("match_image", max_pos = cfg.max_pos).entered();

        let inverted;
        let source = if cfg.bitwise_not {
            inverted = OwnedImage::from_view_inverted(source)?;
            inverted.view()
        } else {
            source
        };

        let output = search::find_candidates(pattern, source, cfg)?;
        let mut candidates = output.candidates;
        let accepted = suppress_overlap(
            &mut candidates,
            pattern.width(),
            pattern.height(),
            cfg.max_overlap,
            cfg.max_pos,
        );

        let mut matches = Vec::with_capacity(accepted.len());
        for cand in accepted {
            matches.push(finalize_match(source, &output.bank, pattern, cand, cfg)?);
        }
        trace_event!("matches", count = matches.len());

        Ok(MatchResult {
            success: !matches.is_empty(),
            matches,
            elapsed_ms: start.elapsed().as_secs_f64() * 1e3,
        })
    }
}

/// Refines an accepted candidate and assembles the externally visible match.
fn finalize_match(
    source: ImageView<'_, u8>,
    bank: &RotationBank<'_>,
    pattern: &Pattern,
    cand: Candidate,
    cfg: &MatchConfig,
) -> PatMatchResult<Match> {
    let tpl_width = pattern.width();
    let tpl_height = pattern.height();
    let max_x = source.width() - tpl_width;
    let max_y = source.height() - tpl_height;

    let plan = bank.plan(cand.angle_idx)?;

    let (x_ref, y_ref, angle_deg, score) = if cfg.sub_pixel_estimation {
        // 3x3 spatial neighborhood; off-image placements stay NEG_INFINITY
        // so the parabolic fit falls back to the integer peak there.
        let mut s = [[f32::NEG_INFINITY; 3]; 3];
        for (iy, dy) in (-1isize..=1).enumerate() {
            let y = cand.y as isize + dy;
            if y < 0 || y > max_y as isize {
                continue;
            }
            for (ix, dx) in (-1isize..=1).enumerate() {
                let x = cand.x as isize + dx;
                if x < 0 || x > max_x as isize {
                    continue;
                }
                s[iy][ix] = kernel::score_at(
                    cfg.use_simd,
                    source,
                    plan,
                    x as usize,
                    y as usize,
                    MIN_WINDOW_VAR,
                );
            }
        }
        let center_score = if s[1][1].is_finite() {
            s[1][1]
        } else {
            cand.score
        };
        let (x_ref, y_ref) = refine_subpixel_2d(cand.x, cand.y, s);

        let sweep = bank.sweep();
        let angle_deg = if cand.angle_idx > 0 && cand.angle_idx + 1 < sweep.len() {
            let sm = kernel::score_at(
                cfg.use_simd,
                source,
                bank.plan(cand.angle_idx - 1)?,
                cand.x,
                cand.y,
                MIN_WINDOW_VAR,
            );
            let sp = kernel::score_at(
                cfg.use_simd,
                source,
                bank.plan(cand.angle_idx + 1)?,
                cand.x,
                cand.y,
                MIN_WINDOW_VAR,
            );
            let offset = parabolic_peak_offset(sm, center_score, sp).unwrap_or(0.0);
            cand.angle_deg + offset * sweep.step_deg()
        } else {
            cand.angle_deg
        };

        (x_ref, y_ref, angle_deg, center_score)
    } else {
        (cand.x as f32, cand.y as f32, cand.angle_deg, cand.score)
    };

    let half_w = (tpl_width as f32 - 1.0) * 0.5;
    let half_h = (tpl_height as f32 - 1.0) * 0.5;
    let center = Point {
        x: x_ref + half_w,
        y: y_ref + half_h,
    };
    let (sin_a, cos_a) = sin_cos_deg(angle_deg);
    let corner = |dx: f32, dy: f32| Point {
        x: center.x + cos_a * dx - sin_a * dy,
        y: center.y + sin_a * dx + cos_a * dy,
    };

    Ok(Match {
        score: score.clamp(0.0, 1.0),
        angle_deg,
        center,
        corners: [
            corner(-half_w, -half_h),
            corner(half_w, -half_h),
            corner(half_w, half_h),
            corner(-half_w, half_h),
        ],
    })
}
