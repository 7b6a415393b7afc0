//! Lazily built rotated-plan cache for one pyramid level.
//!
//! Rotating a pattern raster and recomputing its weighted statistics is the
//! expensive part of rotation search, so each angle slot is populated at most
//! once per match call and stored in a `OnceLock` for thread-safe reuse when
//! the angle sweep is scanned in parallel.

use crate::image::ImageView;
use crate::pattern::plan::RotatedPlan;
use crate::pattern::rotate::rotate_bilinear_masked;
use crate::pose::AngleSweep;
use crate::util::PatMatchResult;
use std::sync::OnceLock;

pub(crate) struct RotationBank<'p> {
    raster: ImageView<'p, u8>,
    sweep: AngleSweep,
    slots: Vec<OnceLock<RotatedPlan>>,
}

impl<'p> RotationBank<'p> {
    pub(crate) fn new(raster: ImageView<'p, u8>, sweep: AngleSweep) -> Self {
        let slots = (0..sweep.len()).map(|_| OnceLock::new()).collect();
        Self {
            raster,
            sweep,
            slots,
        }
    }

    pub(crate) fn sweep(&self) -> &AngleSweep {
        &self.sweep
    }

    pub(crate) fn angle_at(&self, idx: usize) -> f32 {
        self.sweep.angle_at(idx)
    }

    /// Returns the plan for an angle index, rotating lazily on first use.
    pub(crate) fn plan(&self, idx: usize) -> PatMatchResult<&RotatedPlan> {
        let slot = &self.slots[idx];
        if let Some(plan) = slot.get() {
            return Ok(plan);
        }
        let angle_deg = self.sweep.angle_at(idx);
        let (rotated, mask) = rotate_bilinear_masked(self.raster, angle_deg, 0);
        let plan = RotatedPlan::from_view(rotated.view(), &mask)?;
        let _ = slot.set(plan);
        Ok(slot.get().expect("plan slot was just initialized"))
    }
}

#[cfg(test)]
mod tests {
    use super::RotationBank;
    use crate::image::ImageView;
    use crate::pose::AngleSweep;

    #[test]
    fn bank_serves_all_sweep_angles() {
        let mut data = Vec::with_capacity(24 * 24);
        for y in 0..24 {
            for x in 0..24 {
                data.push((((x * 11) ^ (y * 5)) & 0xFF) as u8);
            }
        }
        let raster = ImageView::from_slice(&data, 24, 24).unwrap();
        let sweep = AngleSweep::new(20.0, 5.0).unwrap();
        let bank = RotationBank::new(raster, sweep);
        for idx in 0..bank.sweep().len() {
            let plan = bank.plan(idx).unwrap();
            assert_eq!(plan.width(), 24);
            assert!(plan.var_t() > 0.0);
        }
        // Second lookup hits the cached slot.
        let first = bank.plan(0).unwrap() as *const _;
        let again = bank.plan(0).unwrap() as *const _;
        assert_eq!(first, again);
    }
}
