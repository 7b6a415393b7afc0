//! Sub-pixel and sub-angle peak refinement.
//!
//! Both refinements use separable 3-point parabolic fits over the discrete
//! score samples surrounding an accepted candidate. Offsets are clamped to
//! one sample by construction of the fit, and any ill-conditioned
//! neighborhood falls back silently to the integer-pose value.

mod quad1d;

pub(crate) use quad1d::parabolic_peak_offset;

/// Refines a spatial peak from its 3x3 score neighborhood.
///
/// `s[1][1]` is the score at the integer peak `(center_x, center_y)`; rows
/// index y. Each axis is fitted independently; a failed fit contributes a
/// zero offset.
pub(crate) fn refine_subpixel_2d(center_x: usize, center_y: usize, s: [[f32; 3]; 3]) -> (f32, f32) {
    let dx = parabolic_peak_offset(s[1][0], s[1][1], s[1][2]).unwrap_or(0.0);
    let dy = parabolic_peak_offset(s[0][1], s[1][1], s[2][1]).unwrap_or(0.0);
    (center_x as f32 + dx, center_y as f32 + dy)
}
