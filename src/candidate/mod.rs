//! Candidate detections and pruning utilities.
//!
//! Candidates are transient (position, angle, score) detections collected
//! during search; they are pruned by top-K collection and non-maximum
//! suppression before being promoted to externally visible matches.

pub(crate) mod nms;
pub(crate) mod topk;

use std::cmp::Ordering;

/// Pre-suppression detection at a specific pose and placement.
///
/// `x` and `y` are the top-left corner of the pattern-sized window in source
/// coordinates; the similarity score is the masked ZNCC at that placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// X coordinate (column) of the window's top-left corner.
    pub x: usize,
    /// Y coordinate (row) of the window's top-left corner.
    pub y: usize,
    /// ZNCC score at the placement.
    pub score: f32,
    /// Index into the angle sweep.
    pub angle_idx: usize,
    /// Tested rotation angle in degrees.
    pub angle_deg: f32,
}

/// Ranking order: best score first; exact score ties prefer the angle closer
/// to 0 degrees, then the smaller row, then the smaller column.
pub(crate) fn cmp_ranked(a: &Candidate, b: &Candidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.angle_deg.abs().total_cmp(&b.angle_deg.abs()))
        .then_with(|| a.y.cmp(&b.y))
        .then_with(|| a.x.cmp(&b.x))
        .then_with(|| a.angle_idx.cmp(&b.angle_idx))
}

/// Sorts candidates best-first with deterministic tie-breaking.
pub(crate) fn sort_ranked(candidates: &mut [Candidate]) {
    candidates.sort_by(cmp_ranked);
}

#[cfg(test)]
mod tests {
    use super::{sort_ranked, Candidate};

    fn cand(x: usize, y: usize, score: f32, angle_deg: f32) -> Candidate {
        Candidate {
            x,
            y,
            score,
            angle_idx: 0,
            angle_deg,
        }
    }

    #[test]
    fn ranking_prefers_score_then_small_angle_then_position() {
        let mut cands = vec![
            cand(5, 5, 0.8, 10.0),
            cand(1, 1, 0.9, -20.0),
            cand(2, 2, 0.9, 5.0),
            cand(9, 0, 0.9, 5.0),
            cand(0, 0, 0.9, -5.0),
        ];
        sort_ranked(&mut cands);
        // Equal scores: |5| degrees beats |20|; within |5| the smaller row
        // wins, then the smaller column.
        assert_eq!((cands[0].x, cands[0].y), (0, 0));
        assert_eq!((cands[1].x, cands[1].y), (9, 0));
        assert_eq!((cands[2].x, cands[2].y), (2, 2));
        assert_eq!(cands[3].angle_deg, -20.0);
        assert_eq!(cands[4].score, 0.8);
    }
}
