/// mergerank-core: Suspendable merge-sort ranking engine.
///
/// Unordered items → pairwise human judgments → ranked list with explicit ties.
/// No IO, no terminal, no filesystem. The engine asks, the caller answers.
///
/// Items are identified by caller-provided `i64` IDs plus a display label.
/// Runs are merged bottom-up in FIFO order, so the whole algorithm state is
/// plain data that can be snapshotted between any two judgments.
///
/// # Quick start
///
/// ```rust
/// use mergerank_core::{Decision, Item, RankingSession, SessionConfig, Step};
///
/// let items = vec![Item::new(1, "Blue"), Item::new(2, "Kid A"), Item::new(3, "Ok Computer")];
/// let mut session = RankingSession::new(items, SessionConfig::default()).unwrap();
///
/// let result = loop {
///     match session.next_request() {
///         Step::Compare(request) => {
///             // Ask a human. Here: lower ID wins.
///             let decision = if request.left.representative().id < request.right.representative().id {
///                 Decision::PreferLeft
///             } else {
///                 Decision::PreferRight
///             };
///             session.submit_decision(request.sequence, decision).unwrap();
///         }
///         Step::Complete(result) => break result,
///     }
/// };
///
/// for entry in result.ranked_entries() {
///     println!("{}. {}", entry.rank, entry.item.label);
/// }
/// ```

pub mod constants;
mod cursor;
pub mod error;
pub mod progress;
mod run_queue;
pub mod session;
pub mod snapshot;
pub mod types;

// Re-export primary public API at crate root.
pub use error::{RankError, Result};
pub use progress::{worst_case_comparisons, Progress};
pub use session::{DuplicatePolicy, RankingSession, SessionConfig, TiePolicy};
pub use snapshot::{decode, encode, CursorSnapshot, PendingSnapshot, SessionSnapshot};
pub use types::{ComparisonRequest, Decision, Item, RankGroup, RankedEntry, RankingResult, Step};
