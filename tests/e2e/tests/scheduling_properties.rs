//! Scheduling invariants exercised against real storage: the queue
//! floor, rebuild determinism, and session tier bounds.

use lexmem_core::{
    build_session, rebuild_queue, ReviewType, CRITICAL_THRESHOLD, MAX_CRITICAL, MAX_NORMAL,
    NORMAL_THRESHOLD, PRIORITY_FLOOR,
};
use lexmem_e2e_tests::fixtures;

#[test]
fn test_no_persisted_score_under_the_floor() {
    let (storage, _dir) = fixtures::temp_storage();
    let user = fixtures::user_id();

    fixtures::seed_fresh_word(&storage, &user, "untouched");
    fixtures::seed_reviewed_word(&storage, &user, "shaky", 2, 3, 10, ReviewType::Mcq);
    fixtures::seed_reviewed_word(&storage, &user, "decent", 7, 3, 3, ReviewType::Match);
    let settled = fixtures::seed_settled_word(&storage, &user, "mastered");

    rebuild_queue(&storage, &user).unwrap();
    let queue = storage.get_queue_items(&user).unwrap();

    assert_eq!(queue.len(), 3, "the settled word must not be queued");
    for item in &queue {
        assert!(item.priority_score >= PRIORITY_FLOOR);
        assert!(item.priority_score <= 100.0);
        assert_ne!(item.word_id, settled.id);
        assert!(!item.reason.is_empty());
    }

    // Queue comes back highest urgency first
    for pair in queue.windows(2) {
        assert!(pair[0].priority_score >= pair[1].priority_score);
    }
}

#[test]
fn test_rebuilding_twice_produces_an_identical_queue() {
    let (storage, _dir) = fixtures::temp_storage();
    let user = fixtures::user_id();

    fixtures::seed_fresh_word(&storage, &user, "pristine");
    fixtures::seed_reviewed_word(&storage, &user, "wobbly", 1, 4, 12, ReviewType::Typing);
    fixtures::seed_reviewed_word(&storage, &user, "familiar", 6, 2, 5, ReviewType::Match);

    rebuild_queue(&storage, &user).unwrap();
    let first = storage.get_queue_items(&user).unwrap();

    rebuild_queue(&storage, &user).unwrap();
    let second = storage.get_queue_items(&user).unwrap();

    assert!(!first.is_empty());
    assert_eq!(first, second, "unchanged stats must reproduce the queue exactly");
}

#[test]
fn test_session_tiers_are_capped_and_ordered() {
    let (storage, _dir) = fixtures::temp_storage();
    let user = fixtures::user_id();

    // Eight critical-tier candidates (never reviewed) and three
    // normal-tier ones (halting accuracy, a few days stale)
    for i in 0..8 {
        fixtures::seed_fresh_word(&storage, &user, &format!("critical-{i}"));
    }
    for i in 0..3 {
        fixtures::seed_reviewed_word(
            &storage,
            &user,
            &format!("normal-{i}"),
            2,
            2,
            3,
            ReviewType::Mcq,
        );
    }

    rebuild_queue(&storage, &user).unwrap();
    let session = build_session(&storage, &user).unwrap();

    assert_eq!(session.len(), MAX_CRITICAL + MAX_NORMAL);

    let scores: Vec<f64> = session
        .items()
        .iter()
        .map(|item| item.priority_score)
        .collect();

    // First five all critical tier; the back half holds the overflow
    // criticals and the true normal-tier words, every one above the
    // normal threshold
    assert!(scores[..MAX_CRITICAL]
        .iter()
        .all(|score| *score >= CRITICAL_THRESHOLD));
    assert!(scores[MAX_CRITICAL..]
        .iter()
        .all(|score| *score >= NORMAL_THRESHOLD));

    // Each tier is internally score-descending
    for pair in scores[..MAX_CRITICAL].windows(2) {
        assert!(pair[0] >= pair[1]);
    }
    for pair in scores[MAX_CRITICAL..].windows(2) {
        assert!(pair[0] >= pair[1]);
    }
}

#[test]
fn test_anti_repetition_across_consecutive_sittings() {
    let (storage, _dir) = fixtures::temp_storage();
    let user = fixtures::user_id();

    // Accuracy in the matching tier, last quizzed with match
    let word =
        fixtures::seed_reviewed_word(&storage, &user, "persistent", 3, 2, 8, ReviewType::Match);

    rebuild_queue(&storage, &user).unwrap();
    let session = build_session(&storage, &user).unwrap();
    assert_eq!(session.len(), 1);

    let item = &session.items()[0];
    assert_eq!(item.word_id, word.id);
    // Base selection would repeat match; the fallback steps to mcq
    assert_eq!(item.review_type, ReviewType::Mcq);
}
