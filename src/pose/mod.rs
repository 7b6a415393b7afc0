//! Rotation pose sampling.
//!
//! `AngleSweep` enumerates the discrete rotation hypotheses tested during
//! search: a symmetric, inclusive grid over `[-half_range, +half_range]`
//! degrees that always contains exactly 0 degrees and is ordered ascending,
//! so downstream tie-breaking is reproducible.

use crate::util::{PatMatchError, PatMatchResult};

/// Symmetric discrete angle grid centered on 0 degrees.
#[derive(Clone, Debug)]
pub struct AngleSweep {
    step_deg: f32,
    half_steps: usize,
}

impl AngleSweep {
    /// Creates a sweep over `[-half_range_deg, +half_range_deg]`.
    ///
    /// The requested step is shrunk so that both endpoints land exactly on
    /// grid samples. A zero half-range yields the single angle 0.
    pub fn new(half_range_deg: f32, step_deg: f32) -> PatMatchResult<Self> {
        if !half_range_deg.is_finite() || half_range_deg < 0.0 {
            return Err(PatMatchError::InvalidConfig {
                reason: "angle half-range must be finite and non-negative",
            });
        }
        if !step_deg.is_finite() || step_deg <= 0.0 {
            return Err(PatMatchError::InvalidConfig {
                reason: "angle step must be finite and positive",
            });
        }

        if half_range_deg == 0.0 {
            return Ok(Self {
                step_deg,
                half_steps: 0,
            });
        }

        let half_steps = (half_range_deg / step_deg).ceil().max(1.0) as usize;
        Ok(Self {
            step_deg: half_range_deg / half_steps as f32,
            half_steps,
        })
    }

    /// Creates a sweep whose step keeps boundary-pixel motion near one pixel
    /// between adjacent samples of a `width` x `height` pattern raster.
    pub fn for_raster(half_range_deg: f32, width: usize, height: usize) -> PatMatchResult<Self> {
        let max_dim = width.max(height).max(1) as f32;
        let step_deg = (2.0f32).atan2(max_dim).to_degrees();
        Self::new(half_range_deg, step_deg)
    }

    /// Returns the number of sampled angles.
    pub fn len(&self) -> usize {
        2 * self.half_steps + 1
    }

    /// Returns true if the sweep has no samples (never the case by construction).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the grid step in degrees.
    pub fn step_deg(&self) -> f32 {
        self.step_deg
    }

    /// Returns the index of the 0-degree sample.
    pub fn zero_index(&self) -> usize {
        self.half_steps
    }

    /// Returns the angle in degrees for a sample index.
    pub fn angle_at(&self, idx: usize) -> f32 {
        debug_assert!(idx < self.len());
        if idx == self.half_steps {
            return 0.0;
        }
        (idx as f32 - self.half_steps as f32) * self.step_deg
    }

    /// Iterates over all angles in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.len()).map(|idx| self.angle_at(idx))
    }

    /// Returns the index of the grid sample closest to `angle_deg`.
    pub fn nearest_index(&self, angle_deg: f32) -> usize {
        let raw = (angle_deg / self.step_deg).round() as isize + self.half_steps as isize;
        raw.clamp(0, self.len() as isize - 1) as usize
    }

    /// Returns indices whose angle lies within `half_range_deg` of `center_deg`.
    pub fn indices_within(&self, center_deg: f32, half_range_deg: f32) -> Vec<usize> {
        if half_range_deg < 0.0 {
            return Vec::new();
        }
        let eps = 1e-4f32;
        let lo = ((center_deg - half_range_deg) / self.step_deg - eps).ceil() as isize;
        let hi = ((center_deg + half_range_deg) / self.step_deg + eps).floor() as isize;
        let n = self.half_steps as isize;
        let lo = lo.max(-n);
        let hi = hi.min(n);
        if lo > hi {
            return Vec::new();
        }
        (lo..=hi).map(|k| (k + n) as usize).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::AngleSweep;

    #[test]
    fn zero_tolerance_yields_single_zero_angle() {
        let sweep = AngleSweep::new(0.0, 2.0).unwrap();
        assert_eq!(sweep.len(), 1);
        assert_eq!(sweep.angle_at(0), 0.0);
        assert_eq!(sweep.zero_index(), 0);
    }

    #[test]
    fn sweep_is_symmetric_ascending_and_contains_zero() {
        let sweep = AngleSweep::new(30.0, 4.0).unwrap();
        let angles: Vec<f32> = sweep.iter().collect();
        assert_eq!(angles.len(), sweep.len());
        assert!((angles[0] + 30.0).abs() < 1e-4);
        assert!((angles[angles.len() - 1] - 30.0).abs() < 1e-4);
        assert_eq!(sweep.angle_at(sweep.zero_index()), 0.0);
        for pair in angles.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn step_shrinks_to_land_on_endpoints() {
        let sweep = AngleSweep::new(10.0, 3.0).unwrap();
        // ceil(10/3) = 4 half-steps, so the effective step is 2.5 degrees.
        assert!((sweep.step_deg() - 2.5).abs() < 1e-5);
        assert_eq!(sweep.len(), 9);
    }

    #[test]
    fn nearest_index_snaps_and_clamps() {
        let sweep = AngleSweep::new(10.0, 2.5).unwrap();
        assert_eq!(sweep.nearest_index(0.0), sweep.zero_index());
        assert_eq!(sweep.nearest_index(2.4), sweep.zero_index() + 1);
        assert_eq!(sweep.nearest_index(500.0), sweep.len() - 1);
        assert_eq!(sweep.nearest_index(-500.0), 0);
    }

    #[test]
    fn indices_within_covers_neighborhood() {
        let sweep = AngleSweep::new(10.0, 2.5).unwrap();
        let indices = sweep.indices_within(5.0, 2.5);
        let angles: Vec<f32> = indices.iter().map(|&i| sweep.angle_at(i)).collect();
        assert_eq!(angles, vec![2.5, 5.0, 7.5]);
    }

    #[test]
    fn raster_step_scales_with_size() {
        let small = AngleSweep::for_raster(30.0, 16, 16).unwrap();
        let large = AngleSweep::for_raster(30.0, 128, 128).unwrap();
        assert!(small.step_deg() > large.step_deg());
        assert!(small.len() < large.len());
    }

    #[test]
    fn rejects_negative_half_range() {
        assert!(AngleSweep::new(-1.0, 2.0).is_err());
        assert!(AngleSweep::new(10.0, 0.0).is_err());
    }
}
