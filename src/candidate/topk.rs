//! Top-K candidate collection for scan loops.

use crate::candidate::{cmp_ranked, sort_ranked, Candidate};
use std::cmp::Ordering;

/// Bounded best-candidate collector with O(k) insertion cost.
///
/// K is small (a handful of peaks per angle), so a linear eviction scan beats
/// heap bookkeeping in the hot loop.
pub(crate) struct TopK {
    k: usize,
    items: Vec<Candidate>,
}

impl TopK {
    pub(crate) fn new(k: usize) -> Self {
        Self {
            k,
            items: Vec::with_capacity(k),
        }
    }

    /// Pushes a candidate, evicting the current worst if at capacity.
    pub(crate) fn push(&mut self, cand: Candidate) {
        if self.k == 0 {
            return;
        }
        if self.items.len() < self.k {
            self.items.push(cand);
            return;
        }

        let mut worst_idx = 0usize;
        for (idx, item) in self.items.iter().enumerate().skip(1) {
            if cmp_ranked(item, &self.items[worst_idx]) == Ordering::Greater {
                worst_idx = idx;
            }
        }
        if cmp_ranked(&cand, &self.items[worst_idx]) == Ordering::Less {
            self.items[worst_idx] = cand;
        }
    }

    /// Returns the collected candidates sorted best-first.
    pub(crate) fn into_sorted(mut self) -> Vec<Candidate> {
        sort_ranked(&mut self.items);
        self.items
    }
}
