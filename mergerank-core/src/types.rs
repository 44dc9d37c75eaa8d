use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{RankError, Result};

/// An item to be ranked.
///
/// Identified by a caller-provided `i64` ID. The label is display data only;
/// the engine never looks at it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub label: String,
}

impl Item {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Item { id, label: label.into() }
    }
}

/// The judge's answer to one comparison request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    PreferLeft,
    PreferRight,
    /// Both sides rank the same. Forms a permanent tie group.
    Equal,
}

/// A set of items tied at the same rank, in their pre-merge relative order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankGroup {
    pub items: Vec<Item>,
}

impl RankGroup {
    /// First item of the group. Groups are never empty.
    pub fn representative(&self) -> &Item {
        &self.items[0]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> Vec<i64> {
        self.items.iter().map(|item| item.id).collect()
    }
}

/// A single pending judgment: which of `left` and `right` ranks higher.
///
/// `sequence` must be echoed back with the decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    pub sequence: u64,
    pub left: RankGroup,
    pub right: RankGroup,
}

/// Final ordering, best group first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RankingResult {
    pub groups: Vec<RankGroup>,
}

/// One row of an exported ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// 1-based competition rank: tied items share a rank and the next
    /// group skips ahead by the size of the tie (1, 2, 2, 4).
    pub rank: usize,
    pub item: Item,
}

impl RankingResult {
    /// Number of ranked items (not groups).
    pub fn len(&self) -> usize {
        self.groups.iter().map(RankGroup::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn items_in_order(&self) -> impl Iterator<Item = &Item> {
        self.groups.iter().flat_map(|g| g.items.iter())
    }

    pub fn ranked_entries(&self) -> Vec<RankedEntry> {
        let mut entries = Vec::with_capacity(self.len());
        let mut rank = 1;
        for group in &self.groups {
            for item in &group.items {
                entries.push(RankedEntry { rank, item: item.clone() });
            }
            rank += group.len();
        }
        entries
    }

    /// Rank of the group containing `id`, if present.
    pub fn rank_of(&self, id: i64) -> Option<usize> {
        self.ranked_entries()
            .into_iter()
            .find(|e| e.item.id == id)
            .map(|e| e.rank)
    }
}

/// What the session needs next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Compare(ComparisonRequest),
    Complete(RankingResult),
}

/// Internal group: arena indices, not caller IDs.
pub(crate) type IndexedGroup = Vec<usize>;

/// Internal run: ordered groups of arena indices.
pub(crate) type IndexedRun = Vec<IndexedGroup>;

/// Owns the admitted items. Runs refer to items by position in this arena,
/// so two entries sharing an ID stay distinct.
#[derive(Debug, Clone)]
pub(crate) struct ItemArena {
    items: Vec<Item>,
}

impl ItemArena {
    /// Admit items in order. With `allow_duplicates == false` a repeated ID
    /// is an error.
    pub fn new(items: Vec<Item>, allow_duplicates: bool) -> Result<Self> {
        if !allow_duplicates {
            let mut seen = HashSet::with_capacity(items.len());
            for item in &items {
                if !seen.insert(item.id) {
                    return Err(RankError::DuplicateItem(item.id));
                }
            }
        }
        Ok(ItemArena { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn group(&self, indices: &[usize]) -> RankGroup {
        RankGroup {
            items: indices.iter().map(|&idx| self.items[idx].clone()).collect(),
        }
    }

    pub fn result(&self, run: &[IndexedGroup]) -> RankingResult {
        RankingResult {
            groups: run.iter().map(|g| self.group(g)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(ids: &[i64]) -> RankGroup {
        RankGroup {
            items: ids.iter().map(|&id| Item::new(id, format!("item {id}"))).collect(),
        }
    }

    #[test]
    fn test_ranked_entries_share_rank_for_ties() {
        let result = RankingResult {
            groups: vec![group(&[1]), group(&[2, 3]), group(&[4])],
        };
        let ranks: Vec<(i64, usize)> = result
            .ranked_entries()
            .iter()
            .map(|e| (e.item.id, e.rank))
            .collect();
        assert_eq!(ranks, vec![(1, 1), (2, 2), (3, 2), (4, 4)]);
        assert_eq!(result.len(), 4);
        assert_eq!(result.rank_of(3), Some(2));
        assert_eq!(result.rank_of(99), None);
    }

    #[test]
    fn test_empty_result() {
        let result = RankingResult::default();
        assert!(result.is_empty());
        assert!(result.ranked_entries().is_empty());
    }

    #[test]
    fn test_arena_rejects_duplicate_ids() {
        let items = vec![Item::new(1, "a"), Item::new(2, "b"), Item::new(1, "c")];
        match ItemArena::new(items.clone(), false) {
            Err(RankError::DuplicateItem(1)) => {}
            other => panic!("expected DuplicateItem(1), got {other:?}"),
        }
        let arena = ItemArena::new(items, true).unwrap();
        assert_eq!(arena.len(), 3);
        assert_eq!(arena.group(&[2, 0]).ids(), vec![1, 1]);
    }
}
