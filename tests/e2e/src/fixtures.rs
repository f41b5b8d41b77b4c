//! Test Data Factory
//!
//! Seeds realistic vocabulary and review history through the public
//! Storage API so journey tests exercise the same paths the server
//! does.

use chrono::{Duration, Utc};
use lexmem_core::{ReviewType, Storage, Word};
use tempfile::TempDir;
use uuid::Uuid;

/// Storage backed by a throwaway database file. Keep the TempDir alive
/// for the lifetime of the storage.
pub fn temp_storage() -> (Storage, TempDir) {
    let dir = TempDir::new().expect("create temp dir");
    let storage = Storage::new(Some(dir.path().join("e2e.db"))).expect("open storage");
    (storage, dir)
}

/// A fresh user id.
pub fn user_id() -> String {
    Uuid::new_v4().to_string()
}

/// A word with no review history. Never-reviewed words score well above
/// the queue floor, so these always show up in sessions.
pub fn seed_fresh_word(storage: &Storage, user: &str, text: &str) -> Word {
    storage.create_word(user, text, None).expect("create word")
}

/// A word with `correct`/`wrong` reviews, the most recent of them
/// `days_ago` days old, all using the given format.
pub fn seed_reviewed_word(
    storage: &Storage,
    user: &str,
    text: &str,
    correct: usize,
    wrong: usize,
    days_ago: i64,
    review_type: ReviewType,
) -> Word {
    let word = storage.create_word(user, text, None).expect("create word");

    // Wrong answers first, one minute apart, so the newest review sits
    // exactly `days_ago` days back
    let newest = Utc::now() - Duration::days(days_ago);
    let total = (correct + wrong) as i64;
    let results = std::iter::repeat_n(false, wrong).chain(std::iter::repeat_n(true, correct));
    for (i, result) in results.enumerate() {
        storage
            .record_review_at(
                user,
                &word.id,
                result,
                review_type,
                newest - Duration::minutes(total - 1 - i as i64),
            )
            .expect("record review");
    }

    word
}

/// A word whose history settles it far below the queue floor: perfect
/// recent accuracy at full confidence.
pub fn seed_settled_word(storage: &Storage, user: &str, text: &str) -> Word {
    let word = storage.create_word(user, text, None).expect("create word");
    storage
        .set_confidence(&word.id, user, 5)
        .expect("set confidence");
    for i in 0..5 {
        storage
            .record_review_at(
                user,
                &word.id,
                true,
                ReviewType::Typing,
                Utc::now() - Duration::minutes(i),
            )
            .expect("record review");
    }
    word
}
