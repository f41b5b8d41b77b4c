//! Complete study loop: record words, rebuild the queue, run a
//! session, submit reviews, rebuild again.

use lexmem_core::{build_session, rebuild_queue, ReviewType, PRIORITY_FLOOR};
use lexmem_e2e_tests::fixtures;

#[test]
fn test_fresh_words_flow_through_a_full_sitting() {
    let (storage, _dir) = fixtures::temp_storage();
    let user = fixtures::user_id();

    for text in ["serendipity", "ephemeral", "quixotic"] {
        fixtures::seed_fresh_word(&storage, &user, text);
    }

    let queued = rebuild_queue(&storage, &user).unwrap();
    assert_eq!(queued, 3);

    let mut session = build_session(&storage, &user).unwrap();
    assert_eq!(session.len(), 3);

    // Never-reviewed words open with recognition quizzes and the
    // new-word message
    for item in session.items() {
        assert_eq!(item.review_type, ReviewType::Mcq);
        assert!(item.reason.contains(". This word is new"));
        assert!(item.priority_score >= PRIORITY_FLOOR);
    }

    // Walk the cursor, answering every quiz correctly
    let mut answered = 0;
    while let Some(item) = session.current().cloned() {
        storage
            .record_review(&user, &item.word_id, true, item.review_type)
            .unwrap();
        session.advance();
        answered += 1;
    }
    assert_eq!(answered, 3);
    assert!(session.done());
    assert!(session.current().is_none());

    // Advancing past the end stays a no-op
    session.advance();
    assert_eq!(session.position(), 3);
}

#[test]
fn test_well_known_words_leave_the_queue() {
    let (storage, _dir) = fixtures::temp_storage();
    let user = fixtures::user_id();

    let word = fixtures::seed_fresh_word(&storage, &user, "perspicacious");
    rebuild_queue(&storage, &user).unwrap();
    assert_eq!(storage.get_queue_items(&user).unwrap().len(), 1);

    // Master the word: full confidence, several correct answers today
    storage.set_confidence(&word.id, &user, 5).unwrap();
    for _ in 0..4 {
        storage
            .record_review(&user, &word.id, true, ReviewType::Typing)
            .unwrap();
    }

    rebuild_queue(&storage, &user).unwrap();
    assert!(storage.get_queue_items(&user).unwrap().is_empty());

    let session = build_session(&storage, &user).unwrap();
    assert!(session.is_empty());
    assert!(session.done());
}

#[test]
fn test_struggling_words_escalate_and_pick_matching_quiz() {
    let (storage, _dir) = fixtures::temp_storage();
    let user = fixtures::user_id();

    // 40% accuracy, untouched for ten days, last quizzed as mcq
    let struggler = fixtures::seed_reviewed_word(
        &storage,
        &user,
        "obstreperous",
        2,
        3,
        10,
        ReviewType::Mcq,
    );

    rebuild_queue(&storage, &user).unwrap();
    let queue = storage.get_queue_items(&user).unwrap();
    assert_eq!(queue.len(), 1);
    assert!(queue[0].priority_score >= 60.0, "got {}", queue[0].priority_score);
    assert_eq!(queue[0].reason, "You often answer this incorrectly");

    let session = build_session(&storage, &user).unwrap();
    let item = &session.items()[0];
    assert_eq!(item.word_id, struggler.id);
    // Accuracy 0.4 lands in the matching tier, and the composite reason
    // carries both the queue verdict and the format encouragement
    assert_eq!(item.review_type, ReviewType::Match);
    assert_eq!(
        item.reason,
        "You often answer this incorrectly. You recognize this word — let’s strengthen understanding"
    );
}

#[test]
fn test_queued_word_can_still_miss_the_session_cut() {
    let (storage, _dir) = fixtures::temp_storage();
    let user = fixtures::user_id();

    // 70% accuracy, reviewed three days ago: above the queue floor but
    // under the session's normal tier
    fixtures::seed_reviewed_word(&storage, &user, "equivocate", 7, 3, 3, ReviewType::Match);

    rebuild_queue(&storage, &user).unwrap();
    let queue = storage.get_queue_items(&user).unwrap();
    assert_eq!(queue.len(), 1);
    assert!(queue[0].priority_score >= PRIORITY_FLOOR);
    assert!(queue[0].priority_score < 40.0);

    let session = build_session(&storage, &user).unwrap();
    assert!(session.is_empty());

    // The word survives in the persisted queue for a later rebuild
    assert_eq!(storage.get_queue_items(&user).unwrap().len(), 1);
}
