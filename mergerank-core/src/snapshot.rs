/// Snapshot codec: exact save/restore of a ranking session.
///
/// A snapshot holds everything that affects future `next_request()` and
/// `submit_decision()` behavior: the item arena, every queued run, the merge
/// cursor with its partial output, the outstanding request and the sequence
/// counter. Restoring validates all of it; nothing is repaired.
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::SNAPSHOT_FORMAT_VERSION;
use crate::cursor::MergeCursor;
use crate::error::{RankError, Result};
use crate::progress::ceil_log2;
use crate::run_queue::RunQueue;
use crate::session::{DuplicatePolicy, Pending, RankingSession, SessionConfig};
use crate::types::{IndexedGroup, IndexedRun, Item, ItemArena};

/// Serializable form of a `RankingSession`.
///
/// Runs and groups are stored as positions into `items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub format_version: u32,
    pub config: SessionConfig,
    pub items: Vec<Item>,
    pub queue: Vec<Vec<Vec<usize>>>,
    pub cursor: Option<CursorSnapshot>,
    pub pending: Option<PendingSnapshot>,
    pub next_sequence: u64,
    pub comparisons_made: usize,
    /// Final run, present only once the session is complete.
    pub result: Option<Vec<Vec<usize>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorSnapshot {
    pub left: Vec<Vec<usize>>,
    pub right: Vec<Vec<usize>>,
    pub left_pos: usize,
    pub right_pos: usize,
    pub output: Vec<Vec<usize>>,
}

/// The outstanding request: its sequence number and the head positions it
/// compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSnapshot {
    pub sequence: u64,
    pub left_pos: usize,
    pub right_pos: usize,
}

/// Serialize a snapshot to JSON bytes.
pub fn encode(snapshot: &SessionSnapshot) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(snapshot)?)
}

/// Parse JSON bytes into a snapshot. Malformed input is `CorruptState`.
/// Structural validation happens in `RankingSession::restore`.
pub fn decode(bytes: &[u8]) -> Result<SessionSnapshot> {
    serde_json::from_slice(bytes)
        .map_err(|e| RankError::CorruptState(format!("unreadable snapshot: {e}")))
}

impl RankingSession {
    pub fn snapshot(&self) -> SessionSnapshot {
        let cursor = self.cursor.as_ref().map(|c| CursorSnapshot {
            left: c.left.clone(),
            right: c.right.clone(),
            left_pos: c.left_pos,
            right_pos: c.right_pos,
            output: c.output.clone(),
        });
        let pending = match (self.pending, self.cursor.as_ref()) {
            (Some(p), Some(c)) => Some(PendingSnapshot {
                sequence: p.sequence,
                left_pos: c.left_pos,
                right_pos: c.right_pos,
            }),
            _ => None,
        };

        SessionSnapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            config: self.config,
            items: self.arena.items().to_vec(),
            queue: self.queue.runs().cloned().collect(),
            cursor,
            pending,
            next_sequence: self.next_sequence,
            comparisons_made: self.comparisons_made,
            result: self.final_run.clone(),
        }
    }

    /// Rebuild a session from a snapshot, failing with `CorruptState` on any
    /// structural inconsistency.
    pub fn restore(snapshot: SessionSnapshot) -> Result<Self> {
        validate(&snapshot)?;

        let allow_duplicates = snapshot.config.duplicate_policy == DuplicatePolicy::KeepDistinct;
        let arena = ItemArena::new(snapshot.items, allow_duplicates).map_err(|e| match e {
            RankError::DuplicateItem(id) => {
                corrupt(format!("duplicate item ID {id} under the reject policy"))
            }
            other => other,
        })?;

        let cursor = snapshot.cursor.map(|c| MergeCursor {
            left: c.left,
            right: c.right,
            left_pos: c.left_pos,
            right_pos: c.right_pos,
            output: c.output,
        });
        let result = snapshot.result.as_ref().map(|run| arena.result(run));

        debug!(
            items = arena.len(),
            queued_runs = snapshot.queue.len(),
            complete = result.is_some(),
            "Ranking session restored"
        );

        Ok(RankingSession {
            config: snapshot.config,
            arena,
            queue: RunQueue::from_runs(snapshot.queue),
            cursor,
            pending: snapshot.pending.map(|p| Pending { sequence: p.sequence }),
            next_sequence: snapshot.next_sequence,
            comparisons_made: snapshot.comparisons_made,
            final_run: snapshot.result,
            result,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode(&self.snapshot())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::restore(decode(bytes)?)
    }
}

fn corrupt(reason: impl Into<String>) -> RankError {
    RankError::CorruptState(reason.into())
}

/// Mark every index of `run` as seen. Each arena index may be claimed once.
fn claim_run(seen: &mut [bool], run: &[IndexedGroup], context: &str) -> Result<()> {
    if run.is_empty() {
        return Err(corrupt(format!("empty run in {context}")));
    }
    claim_groups(seen, run, context)
}

fn claim_groups(seen: &mut [bool], groups: &[IndexedGroup], context: &str) -> Result<()> {
    for group in groups {
        if group.is_empty() {
            return Err(corrupt(format!("empty rank group in {context}")));
        }
        for &idx in group {
            match seen.get_mut(idx) {
                None => {
                    return Err(corrupt(format!(
                        "item index {idx} out of bounds in {context} ({} items)",
                        seen.len()
                    )))
                }
                Some(true) => return Err(corrupt(format!("item index {idx} appears twice ({context})"))),
                Some(slot) => *slot = true,
            }
        }
    }
    Ok(())
}

fn flattened_sorted(groups: &[IndexedGroup]) -> Vec<usize> {
    let mut all: Vec<usize> = groups.iter().flatten().copied().collect();
    all.sort_unstable();
    all
}

fn validate_cursor(cursor: &CursorSnapshot, seen: &mut [bool]) -> Result<()> {
    claim_run(seen, &cursor.left, "cursor left run")?;
    claim_run(seen, &cursor.right, "cursor right run")?;

    if cursor.left_pos > cursor.left.len() || cursor.right_pos > cursor.right.len() {
        return Err(corrupt(format!(
            "cursor position ({}, {}) past run lengths ({}, {})",
            cursor.left_pos,
            cursor.right_pos,
            cursor.left.len(),
            cursor.right.len()
        )));
    }

    if cursor.output.iter().any(Vec::is_empty) {
        return Err(corrupt("empty rank group in cursor output"));
    }
    let mut consumed: IndexedRun = cursor.left[..cursor.left_pos].to_vec();
    consumed.extend_from_slice(&cursor.right[..cursor.right_pos]);
    if flattened_sorted(&consumed) != flattened_sorted(&cursor.output) {
        return Err(corrupt("cursor output does not match the consumed run prefixes"));
    }
    Ok(())
}

fn validate(s: &SessionSnapshot) -> Result<()> {
    if s.format_version != SNAPSHOT_FORMAT_VERSION {
        return Err(corrupt(format!(
            "unsupported snapshot format version {} (expected {SNAPSHOT_FORMAT_VERSION})",
            s.format_version
        )));
    }
    if s.next_sequence == 0 {
        return Err(corrupt("sequence counter must start at 1"));
    }

    let mut seen = vec![false; s.items.len()];

    if let Some(result) = &s.result {
        if !s.queue.is_empty() || s.cursor.is_some() || s.pending.is_some() {
            return Err(corrupt("completed session still has queued runs or an active merge"));
        }
        claim_groups(&mut seen, result, "result")?;
    } else {
        for run in &s.queue {
            claim_run(&mut seen, run, "run queue")?;
        }
        match &s.cursor {
            Some(cursor) => validate_cursor(cursor, &mut seen)?,
            None if s.queue.len() < 2 => {
                return Err(corrupt("active session has nothing left to merge"));
            }
            None => {}
        }
    }

    if let Some(missing) = seen.iter().position(|&claimed| !claimed) {
        return Err(corrupt(format!("item index {missing} is not in any run")));
    }

    // No merge sort of n items asks more than n * ceil(log2 n) questions.
    let max_comparisons = s.items.len() * ceil_log2(s.items.len());
    if s.comparisons_made > max_comparisons {
        return Err(corrupt(format!(
            "{} decisions recorded, more than the {max_comparisons} possible for {} items",
            s.comparisons_made,
            s.items.len()
        )));
    }

    // Every issued request was either answered or is the one outstanding.
    let issued = s.next_sequence - 1;
    let outstanding = u64::from(s.pending.is_some());
    if s.comparisons_made as u64 + outstanding != issued {
        return Err(corrupt(format!(
            "{} decisions and {outstanding} outstanding request(s) do not account for {issued} issued",
            s.comparisons_made
        )));
    }

    if let Some(pending) = &s.pending {
        let Some(cursor) = &s.cursor else {
            return Err(corrupt("outstanding request without an active merge"));
        };
        if pending.sequence != issued {
            return Err(corrupt(format!(
                "outstanding request {} is not the latest issued ({issued})",
                pending.sequence
            )));
        }
        if pending.left_pos != cursor.left_pos || pending.right_pos != cursor.right_pos {
            return Err(corrupt("outstanding request does not match the cursor heads"));
        }
        if cursor.left_pos >= cursor.left.len() || cursor.right_pos >= cursor.right.len() {
            return Err(corrupt("outstanding request points past the end of a run"));
        }
    }

    Ok(())
}
