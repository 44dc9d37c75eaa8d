/// Merge cursor: progress through merging exactly two runs.
///
/// Works on arena indices. Only a real judgment between the two head groups
/// needs the caller; an exhausted side is resolved here without asking.
use crate::types::{Decision, IndexedGroup, IndexedRun};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MergeCursor {
    pub left: IndexedRun,
    pub right: IndexedRun,
    pub left_pos: usize,
    pub right_pos: usize,
    pub output: IndexedRun,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CursorState {
    /// A decision between these two head groups is needed.
    NeedsDecision(IndexedGroup, IndexedGroup),
    /// Both runs fully consumed; `output` is the merged run.
    Finished,
}

impl MergeCursor {
    pub fn new(left: IndexedRun, right: IndexedRun) -> Self {
        let capacity = left.len() + right.len();
        MergeCursor {
            left,
            right,
            left_pos: 0,
            right_pos: 0,
            output: Vec::with_capacity(capacity),
        }
    }

    /// Head groups currently being compared. `None` once a side is exhausted.
    pub fn heads(&self) -> Option<(&IndexedGroup, &IndexedGroup)> {
        match (self.left.get(self.left_pos), self.right.get(self.right_pos)) {
            (Some(l), Some(r)) => Some((l, r)),
            _ => None,
        }
    }

    /// Drain whichever side remains once the other is exhausted.
    /// The remaining suffix is already ordered, so nothing is asked.
    pub fn advance(&mut self) -> CursorState {
        if let Some((left, right)) = self.heads() {
            return CursorState::NeedsDecision(left.clone(), right.clone());
        }

        self.output.extend_from_slice(&self.left[self.left_pos..]);
        self.left_pos = self.left.len();
        self.output.extend_from_slice(&self.right[self.right_pos..]);
        self.right_pos = self.right.len();

        CursorState::Finished
    }

    /// Apply a decision about the current heads. Caller guarantees both heads
    /// are in bounds.
    pub fn apply(&mut self, decision: Decision) {
        match decision {
            Decision::PreferLeft => {
                self.output.push(self.left[self.left_pos].clone());
                self.left_pos += 1;
            }
            Decision::PreferRight => {
                self.output.push(self.right[self.right_pos].clone());
                self.right_pos += 1;
            }
            Decision::Equal => {
                let mut tied = self.left[self.left_pos].clone();
                tied.extend_from_slice(&self.right[self.right_pos]);
                self.output.push(tied);
                self.left_pos += 1;
                self.right_pos += 1;
            }
        }
    }

    pub fn into_output(self) -> IndexedRun {
        self.output
    }
}
