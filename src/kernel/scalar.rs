//! Scalar reference kernel for masked ZNCC scoring.

use crate::image::ImageView;
use crate::kernel::Kernel;
use crate::pattern::RotatedPlan;

/// Baseline scalar kernel; the numeric reference for the SIMD path.
pub(crate) struct ScalarKernel;

impl Kernel for ScalarKernel {
    fn score_at(
        image: ImageView<'_, u8>,
        plan: &RotatedPlan,
        x: usize,
        y: usize,
        min_var_i: f32,
    ) -> f32 {
        let img_width = image.width();
        let img_height = image.height();
        let tpl_width = plan.width();
        let tpl_height = plan.height();

        if img_width < tpl_width || img_height < tpl_height {
            return f32::NEG_INFINITY;
        }
        if x > img_width - tpl_width || y > img_height - tpl_height {
            return f32::NEG_INFINITY;
        }

        let var_t = plan.var_t();
        if var_t <= 1e-8 {
            return f32::NEG_INFINITY;
        }
        let sum_w = plan.sum_w();
        let t_prime = plan.t_prime();
        let weights = plan.weights();

        let mut dot = 0.0f32;
        let mut sum_i = 0.0f32;
        let mut sum_i2 = 0.0f32;

        for ty in 0..tpl_height {
            let img_row = image.row(y + ty).expect("row within bounds for score");
            let base = ty * tpl_width;
            for tx in 0..tpl_width {
                let idx = base + tx;
                if weights[idx] == 0.0 {
                    continue;
                }
                let value = img_row[x + tx] as f32;
                dot += t_prime[idx] * value;
                sum_i += value;
                sum_i2 += value * value;
            }
        }

        let var_i = sum_i2 - (sum_i * sum_i) / sum_w;
        if var_i <= min_var_i {
            return f32::NEG_INFINITY;
        }

        let score = dot / (var_t * var_i).sqrt();
        if score.is_finite() {
            score
        } else {
            f32::NEG_INFINITY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ScalarKernel;
    use crate::image::ImageView;
    use crate::kernel::{scan_range, Kernel, ScanParams};
    use crate::pattern::RotatedPlan;

    fn textured(width: usize, height: usize, seed: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push((((x * 17) ^ (y * 9) ^ (x * y) ^ seed) & 0xFF) as u8);
            }
        }
        data
    }

    #[test]
    fn scan_matches_bruteforce_argmax() {
        let img = textured(9, 7, 0);
        let image = ImageView::from_slice(&img, 9, 7).unwrap();
        let tpl = textured(4, 3, 5);
        let tpl_view = ImageView::from_slice(&tpl, 4, 3).unwrap();
        let mask = vec![1u8; 12];
        let plan = RotatedPlan::from_view(tpl_view, &mask).unwrap();

        let params = ScanParams {
            topk: 1,
            min_var_i: 1e-8,
            min_score: f32::NEG_INFINITY,
        };
        let best = scan_range::<ScalarKernel>(image, &plan, 0, 0.0, 0, 0, 99, 99, params)
            .pop()
            .unwrap();

        let mut best_score = f32::NEG_INFINITY;
        let mut best_pos = (0usize, 0usize);
        for y in 0..=(7 - 3) {
            for x in 0..=(9 - 4) {
                let score = ScalarKernel::score_at(image, &plan, x, y, 1e-8);
                if score > best_score {
                    best_score = score;
                    best_pos = (x, y);
                }
            }
        }
        assert_eq!((best.x, best.y), best_pos);
        assert!((best.score - best_score).abs() < 1e-6);
    }

    #[test]
    fn exact_placement_scores_one() {
        let img = textured(20, 16, 3);
        let image = ImageView::from_slice(&img, 20, 16).unwrap();
        // Template cut from the image at (6, 4).
        let mut tpl = Vec::new();
        for y in 4..12 {
            for x in 6..14 {
                tpl.push(img[y * 20 + x]);
            }
        }
        let tpl_view = ImageView::from_slice(&tpl, 8, 8).unwrap();
        let mask = vec![1u8; 64];
        let plan = RotatedPlan::from_view(tpl_view, &mask).unwrap();

        let score = ScalarKernel::score_at(image, &plan, 6, 4, 1e-8);
        assert!(score > 0.9999, "got {score}");
    }

    #[test]
    fn out_of_bounds_placement_is_rejected() {
        let img = textured(10, 10, 1);
        let image = ImageView::from_slice(&img, 10, 10).unwrap();
        let tpl = textured(4, 4, 2);
        let tpl_view = ImageView::from_slice(&tpl, 4, 4).unwrap();
        let mask = vec![1u8; 16];
        let plan = RotatedPlan::from_view(tpl_view, &mask).unwrap();
        assert_eq!(
            ScalarKernel::score_at(image, &plan, 7, 0, 1e-8),
            f32::NEG_INFINITY
        );
    }

    #[test]
    fn flat_window_is_skipped() {
        let img = vec![50u8; 100];
        let image = ImageView::from_slice(&img, 10, 10).unwrap();
        let tpl = textured(4, 4, 2);
        let tpl_view = ImageView::from_slice(&tpl, 4, 4).unwrap();
        let mask = vec![1u8; 16];
        let plan = RotatedPlan::from_view(tpl_view, &mask).unwrap();
        assert_eq!(
            ScalarKernel::score_at(image, &plan, 0, 0, 1e-6),
            f32::NEG_INFINITY
        );
    }
}
