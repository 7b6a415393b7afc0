//! 3-point parabolic peak fit along one axis.

/// Estimates the sub-sample peak offset from three neighboring scores.
///
/// Given samples at offsets `-1, 0, +1` (`fm`, `f0`, `fp`), returns the
/// vertex offset of the fitted parabola, which is valid only when the fit is
/// concave and the vertex stays within one sample of the center. Saturated or
/// monotonic neighborhoods return `None` so the caller falls back to the
/// integer peak instead of extrapolating.
pub(crate) fn parabolic_peak_offset(fm: f32, f0: f32, fp: f32) -> Option<f32> {
    if !fm.is_finite() || !f0.is_finite() || !fp.is_finite() {
        return None;
    }

    let curvature = fm - 2.0 * f0 + fp;
    if curvature.abs() < 1e-6 || curvature >= 0.0 {
        return None;
    }

    let offset = 0.5 * (fm - fp) / curvature;
    if offset.is_finite() && offset.abs() <= 1.0 {
        Some(offset)
    } else {
        None
    }
}
