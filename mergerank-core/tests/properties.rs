//! Property tests: a consistent judge drives sessions over random inputs.

use mergerank_core::progress::{ceil_log2, worst_case_comparisons};
use mergerank_core::{
    ComparisonRequest, Decision, Item, RankError, RankingResult, RankingSession, SessionConfig,
    Step,
};
use proptest::prelude::*;

/// Items whose hidden quality is `scores[i]`. IDs are positions.
fn items_for(scores: &[u8]) -> Vec<Item> {
    scores
        .iter()
        .enumerate()
        .map(|(i, s)| Item::new(i as i64, format!("item {i} (score {s})")))
        .collect()
}

/// Transitive judge: higher score wins, equal scores tie.
fn judge(scores: &[u8], request: &ComparisonRequest) -> Decision {
    let left = scores[request.left.representative().id as usize];
    let right = scores[request.right.representative().id as usize];
    match left.cmp(&right) {
        std::cmp::Ordering::Greater => Decision::PreferLeft,
        std::cmp::Ordering::Less => Decision::PreferRight,
        std::cmp::Ordering::Equal => Decision::Equal,
    }
}

/// Drive `session` to completion, returning every request seen and the result.
fn drive(
    session: &mut RankingSession,
    scores: &[u8],
) -> (Vec<ComparisonRequest>, RankingResult) {
    let mut requests = Vec::new();
    loop {
        match session.next_request() {
            Step::Compare(request) => {
                let decision = judge(scores, &request);
                session.submit_decision(request.sequence, decision).unwrap();
                requests.push(request);
            }
            Step::Complete(result) => return (requests, result),
        }
    }
}

proptest! {
    #[test]
    fn comparison_count_within_merge_sort_bounds(scores in prop::collection::vec(0u8..=255, 0..64)) {
        let n = scores.len();
        let mut session = RankingSession::new(items_for(&scores), SessionConfig::default()).unwrap();
        let (requests, result) = drive(&mut session, &scores);

        prop_assert_eq!(requests.len(), session.comparisons_made());
        prop_assert_eq!(result.len(), n);
        if n <= 1 {
            prop_assert_eq!(requests.len(), 0);
        } else {
            prop_assert!(requests.len() >= n - 1);
            prop_assert!(requests.len() <= n * ceil_log2(n));
        }
    }

    #[test]
    fn strict_order_stays_within_worst_case_estimate(
        scores in (1usize..200).prop_flat_map(|n| Just((0..n as u8).collect::<Vec<u8>>()).prop_shuffle())
    ) {
        let n = scores.len();
        let mut session = RankingSession::new(items_for(&scores), SessionConfig::default()).unwrap();
        let (requests, result) = drive(&mut session, &scores);

        prop_assert!(requests.iter().all(|r| r.left.len() == 1 && r.right.len() == 1));
        prop_assert!(requests.len() <= worst_case_comparisons(n));
        prop_assert_eq!(session.progress().estimated_total, worst_case_comparisons(n));
        prop_assert_eq!(result.groups.len(), n);
    }

    #[test]
    fn result_is_consistent_with_judge(scores in prop::collection::vec(0u8..6, 0..48)) {
        let mut session = RankingSession::new(items_for(&scores), SessionConfig::default()).unwrap();
        let (_, result) = drive(&mut session, &scores);

        let group_scores: Vec<u8> = result
            .groups
            .iter()
            .map(|group| {
                let first = scores[group.representative().id as usize];
                for item in &group.items {
                    assert_eq!(scores[item.id as usize], first, "tie group mixes scores");
                }
                first
            })
            .collect();

        // Strictly descending: every distinct score forms exactly one group.
        for pair in group_scores.windows(2) {
            prop_assert!(pair[0] > pair[1]);
        }
        let mut distinct = scores.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(group_scores.len(), distinct.len());
    }

    #[test]
    fn tie_groups_keep_request_order(scores in prop::collection::vec(0u8..3, 2..32)) {
        let mut session = RankingSession::new(items_for(&scores), SessionConfig::default()).unwrap();
        let (requests, result) = drive(&mut session, &scores);

        // The last time two groups were declared equal, the merged group is
        // left members followed by right members. That order must survive.
        for request in requests.iter().filter(|r| judge(&scores, r) == Decision::Equal) {
            let expected: Vec<i64> = request.left.ids().into_iter().chain(request.right.ids()).collect();
            let group = result
                .groups
                .iter()
                .find(|g| g.items.iter().any(|i| i.id == expected[0]))
                .unwrap();
            let ids = group.ids();
            let positions: Vec<usize> = expected
                .iter()
                .map(|id| ids.iter().position(|x| x == id).unwrap())
                .collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn resume_from_snapshot_is_equivalent(
        scores in prop::collection::vec(0u8..8, 0..40),
        cut in 0usize..200,
        fetch_before_cut in any::<bool>(),
    ) {
        let mut uninterrupted = RankingSession::new(items_for(&scores), SessionConfig::default()).unwrap();
        let (expected_requests, expected_result) = drive(&mut uninterrupted, &scores);

        let mut session = RankingSession::new(items_for(&scores), SessionConfig::default()).unwrap();
        let mut seen = Vec::new();
        while seen.len() < cut {
            match session.next_request() {
                Step::Compare(request) => {
                    session.submit_decision(request.sequence, judge(&scores, &request)).unwrap();
                    seen.push(request);
                }
                Step::Complete(_) => break,
            }
        }
        if fetch_before_cut {
            let _ = session.next_request();
        }

        let bytes = session.to_bytes().unwrap();
        let mut resumed = RankingSession::from_bytes(&bytes).unwrap();
        prop_assert_eq!(resumed.snapshot(), session.snapshot());

        let (rest, result) = drive(&mut resumed, &scores);
        seen.extend(rest);
        prop_assert_eq!(seen, expected_requests);
        prop_assert_eq!(result, expected_result);
    }

    #[test]
    fn repeated_fetch_and_stale_submit_do_not_change_state(
        scores in prop::collection::vec(0u8..8, 2..24),
        steps in 0usize..20,
        offset in 1u64..5,
    ) {
        let mut session = RankingSession::new(items_for(&scores), SessionConfig::default()).unwrap();
        for _ in 0..steps {
            if let Step::Compare(request) = session.next_request() {
                session.submit_decision(request.sequence, judge(&scores, &request)).unwrap();
            }
        }

        let first = session.next_request();
        let before = session.snapshot();
        prop_assert_eq!(session.next_request(), first.clone());
        prop_assert_eq!(session.snapshot(), before.clone());

        let sequence = match &first {
            Step::Compare(request) => request.sequence,
            Step::Complete(_) => 0,
        };
        for wrong in [sequence + offset, sequence.saturating_sub(offset)] {
            if wrong == sequence {
                continue;
            }
            let outcome = session.submit_decision(wrong, Decision::PreferLeft);
            let rejected = matches!(outcome, Err(RankError::InvalidDecision { .. }));
            prop_assert!(rejected);
            prop_assert_eq!(session.snapshot(), before.clone());
        }
    }
}
