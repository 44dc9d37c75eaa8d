/// Ranking session: the request/decision protocol around the merge sort.
///
/// The caller pulls the next judgment with `next_request()`, asks a human,
/// and pushes the answer back with `submit_decision()`. Nothing here blocks
/// or performs IO. Persisting a session is an explicit `snapshot()`.
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cursor::{CursorState, MergeCursor};
use crate::error::{RankError, Result};
use crate::progress::Progress;
use crate::run_queue::RunQueue;
use crate::types::{
    ComparisonRequest, Decision, IndexedGroup, IndexedRun, Item, ItemArena, RankingResult,
    Step,
};

/// What `Decision::Equal` is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiePolicy {
    /// Equal items form a permanent tie group.
    #[default]
    Group,
    /// Equal is rejected; every pair must be ordered.
    Forbid,
}

/// How repeated item IDs in the input are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// A repeated ID fails session creation with `DuplicateItem`.
    #[default]
    Reject,
    /// Repeated IDs are separate entries and each appears once in the result.
    KeepDistinct,
}

/// Configuration for a ranking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub tie_policy: TiePolicy,
    pub duplicate_policy: DuplicatePolicy,
}

/// Request currently waiting for a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pending {
    pub sequence: u64,
}

/// Where `settle()` stopped.
enum Settled {
    /// Head groups of the active merge, awaiting a decision.
    Waiting(IndexedGroup, IndexedGroup),
    Done(RankingResult),
}

#[derive(Debug, Clone)]
pub struct RankingSession {
    pub(crate) config: SessionConfig,
    pub(crate) arena: ItemArena,
    pub(crate) queue: RunQueue,
    pub(crate) cursor: Option<MergeCursor>,
    pub(crate) pending: Option<Pending>,
    /// Sequence number the next issued request will carry.
    pub(crate) next_sequence: u64,
    /// Accepted decisions so far.
    pub(crate) comparisons_made: usize,
    /// Final run in arena indices, kept alongside `result` for snapshots.
    pub(crate) final_run: Option<IndexedRun>,
    pub(crate) result: Option<RankingResult>,
}

impl RankingSession {
    /// Start a session over `items` in the given order.
    ///
    /// Zero or one item completes immediately without any comparisons.
    pub fn new(items: Vec<Item>, config: SessionConfig) -> Result<Self> {
        let allow_duplicates = config.duplicate_policy == DuplicatePolicy::KeepDistinct;
        let arena = ItemArena::new(items, allow_duplicates)?;
        let queue = RunQueue::singletons(arena.len());

        let mut session = RankingSession {
            config,
            arena,
            queue,
            cursor: None,
            pending: None,
            next_sequence: 1,
            comparisons_made: 0,
            final_run: None,
            result: None,
        };
        let _ = session.settle();
        debug!(items = session.arena.len(), "Ranking session created");
        Ok(session)
    }

    /// The outstanding comparison, or the final ranking once sorting is done.
    ///
    /// Idempotent: without an intervening decision, repeated calls return the
    /// same request with the same sequence number.
    pub fn next_request(&mut self) -> Step {
        if let Some(pending) = self.pending {
            if let Some(request) = self.build_request(pending.sequence) {
                return Step::Compare(request);
            }
        }

        match self.settle() {
            Settled::Done(result) => Step::Complete(result),
            Settled::Waiting(left, right) => {
                let sequence = self.next_sequence;
                // Restored counters are bounded by the item count, so this cannot wrap.
                self.next_sequence += 1;
                self.pending = Some(Pending { sequence });
                let request = ComparisonRequest {
                    sequence,
                    left: self.arena.group(&left),
                    right: self.arena.group(&right),
                };
                debug!(
                    sequence,
                    left = request.left.representative().id,
                    right = request.right.representative().id,
                    "Comparison requested"
                );
                Step::Compare(request)
            }
        }
    }

    /// Answer the outstanding request.
    ///
    /// Rejected without touching state when `sequence` is stale, when no
    /// request is outstanding, or when ties are forbidden and `decision` is
    /// `Equal`.
    pub fn submit_decision(&mut self, sequence: u64, decision: Decision) -> Result<()> {
        let expected = self.pending.map(|p| p.sequence);
        if expected != Some(sequence) {
            warn!(?expected, got = sequence, "Rejected stale or unexpected decision");
            return Err(RankError::InvalidDecision { expected, got: sequence });
        }
        if decision == Decision::Equal && self.config.tie_policy == TiePolicy::Forbid {
            warn!(sequence, "Rejected tie: ties are forbidden in this session");
            return Err(RankError::TieNotAllowed);
        }

        let Some(cursor) = self.cursor.as_mut() else {
            return Err(RankError::InvalidDecision { expected: None, got: sequence });
        };
        cursor.apply(decision);
        self.pending = None;
        self.comparisons_made += 1;
        debug!(sequence, ?decision, "Decision accepted");
        Ok(())
    }

    /// Advance until either a real comparison is needed or the sort is done.
    ///
    /// Exhausted-side merges and run scheduling happen here; no judgment is
    /// consumed.
    fn settle(&mut self) -> Settled {
        if let Some(result) = &self.result {
            return Settled::Done(result.clone());
        }
        loop {
            if let Some(cursor) = self.cursor.as_mut() {
                match cursor.advance() {
                    CursorState::NeedsDecision(left, right) => return Settled::Waiting(left, right),
                    CursorState::Finished => {
                        if let Some(cursor) = self.cursor.take() {
                            self.queue.push(cursor.into_output());
                            debug!(queued_runs = self.queue.len(), "Merged runs");
                        }
                    }
                }
                continue;
            }

            match self.queue.pop_pair() {
                Some((left, right)) => self.cursor = Some(MergeCursor::new(left, right)),
                None => {
                    let final_run = self.queue.take_final().unwrap_or_default();
                    let result = self.arena.result(&final_run);
                    debug!(
                        groups = result.groups.len(),
                        comparisons = self.comparisons_made,
                        "Ranking complete"
                    );
                    self.final_run = Some(final_run);
                    self.result = Some(result.clone());
                    return Settled::Done(result);
                }
            }
        }
    }

    fn build_request(&self, sequence: u64) -> Option<ComparisonRequest> {
        let (left, right) = self.cursor.as_ref()?.heads()?;
        Some(ComparisonRequest {
            sequence,
            left: self.arena.group(left),
            right: self.arena.group(right),
        })
    }

    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Option<&RankingResult> {
        self.result.as_ref()
    }

    /// The outstanding request, without advancing anything.
    pub fn pending(&self) -> Option<ComparisonRequest> {
        self.build_request(self.pending?.sequence)
    }

    pub fn comparisons_made(&self) -> usize {
        self.comparisons_made
    }

    pub fn progress(&self) -> Progress {
        Progress::new(self.comparisons_made, self.arena.len())
    }

    pub fn items(&self) -> &[Item] {
        self.arena.items()
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }
}
