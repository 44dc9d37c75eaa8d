/// Progress estimation for a ranking session.
use serde::{Deserialize, Serialize};

/// Worst-case number of judgments to fully rank `num_items` without ties:
/// `n * ceil(log2 n) - n + 1`. Zero for fewer than two items.
///
/// Ties only ever shorten a merge, so this stays an upper bound.
pub fn worst_case_comparisons(num_items: usize) -> usize {
    if num_items < 2 {
        return 0;
    }
    let levels = ceil_log2(num_items);
    num_items * levels - num_items + 1
}

/// `ceil(log2 n)` for `n >= 1`.
pub fn ceil_log2(n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    (usize::BITS - (n - 1).leading_zeros()) as usize
}

/// Judgments made so far against the worst-case estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub completed: usize,
    /// Never below `completed`.
    pub estimated_total: usize,
}

impl Progress {
    pub fn new(completed: usize, num_items: usize) -> Self {
        Progress {
            completed,
            estimated_total: worst_case_comparisons(num_items).max(completed),
        }
    }

    /// Completed fraction in `[0, 1]`. A session with nothing to compare is done.
    pub fn fraction(&self) -> f64 {
        if self.estimated_total == 0 {
            return 1.0;
        }
        self.completed as f64 / self.estimated_total as f64
    }
}
