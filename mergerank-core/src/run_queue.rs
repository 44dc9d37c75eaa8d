/// FIFO of sorted runs awaiting merging.
///
/// Bottom-up merge scheduling: the two runs at the front are always the next
/// pair, and the merged run goes to the back. No recursion, so the whole
/// schedule is plain data.
use std::collections::VecDeque;

use crate::types::IndexedRun;

#[derive(Debug, Clone, Default)]
pub(crate) struct RunQueue {
    runs: VecDeque<IndexedRun>,
}

impl RunQueue {
    /// One singleton run per arena index, in input order.
    pub fn singletons(num_items: usize) -> Self {
        RunQueue {
            runs: (0..num_items).map(|idx| vec![vec![idx]]).collect(),
        }
    }

    pub fn from_runs(runs: Vec<IndexedRun>) -> Self {
        RunQueue { runs: runs.into() }
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Take the next pair to merge. `None` when fewer than two runs remain.
    pub fn pop_pair(&mut self) -> Option<(IndexedRun, IndexedRun)> {
        if self.runs.len() < 2 {
            return None;
        }
        let left = self.runs.pop_front()?;
        let right = self.runs.pop_front()?;
        Some((left, right))
    }

    pub fn push(&mut self, run: IndexedRun) {
        self.runs.push_back(run);
    }

    /// Remove the last remaining run. Only meaningful once merging is done.
    pub fn take_final(&mut self) -> Option<IndexedRun> {
        if self.runs.len() == 1 {
            self.runs.pop_front()
        } else {
            None
        }
    }

    pub fn runs(&self) -> impl Iterator<Item = &IndexedRun> {
        self.runs.iter()
    }
}
