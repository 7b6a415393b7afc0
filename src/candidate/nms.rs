//! Non-maximum suppression for candidate detections.

use crate::candidate::{sort_ranked, Candidate};

/// Suppresses near-duplicate peaks using Chebyshev distance.
///
/// Candidates are ranked best-first and kept if they are farther than
/// `radius` in Chebyshev distance from every previously kept candidate.
/// Used inside the pyramid stages to thin per-angle peak clusters before
/// they multiply across refinement levels.
pub(crate) fn suppress_chebyshev(candidates: &mut [Candidate], radius: usize) -> Vec<Candidate> {
    sort_ranked(candidates);
    if radius == 0 {
        return candidates.to_owned();
    }

    let mut kept: Vec<Candidate> = Vec::new();
    'outer: for cand in candidates.iter().copied() {
        for prev in kept.iter() {
            let dx = cand.x.abs_diff(prev.x);
            let dy = cand.y.abs_diff(prev.y);
            if dx.max(dy) <= radius {
                continue 'outer;
            }
        }
        kept.push(cand);
    }
    kept
}

/// Greedy footprint-overlap suppression for the final ranking stage.
///
/// Candidates are ranked best-first; one is accepted when the overlap
/// fraction of its pattern-sized footprint with every already accepted
/// footprint does not exceed `max_overlap` (0 means any overlap suppresses).
/// At most `max_count` candidates are accepted, so each physical occurrence
/// is represented by its single best-scoring pose.
pub(crate) fn suppress_overlap(
    candidates: &mut [Candidate],
    width: usize,
    height: usize,
    max_overlap: f32,
    max_count: usize,
) -> Vec<Candidate> {
    sort_ranked(candidates);
    let area = (width * height) as f32;

    let mut kept: Vec<Candidate> = Vec::new();
    'outer: for cand in candidates.iter().copied() {
        if kept.len() >= max_count {
            break;
        }
        for prev in kept.iter() {
            let overlap = overlap_fraction(cand, *prev, width, height, area);
            if overlap > max_overlap {
                continue 'outer;
            }
        }
        kept.push(cand);
    }
    kept
}

fn overlap_fraction(
    a: Candidate,
    b: Candidate,
    width: usize,
    height: usize,
    area: f32,
) -> f32 {
    let dx = a.x.abs_diff(b.x);
    let dy = a.y.abs_diff(b.y);
    if dx >= width || dy >= height {
        return 0.0;
    }
    let inter = ((width - dx) * (height - dy)) as f32;
    inter / area
}
