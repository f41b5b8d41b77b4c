//! Review Queue Rebuilds
//!
//! Recomputes and persists the ranked candidate set for one user:
//! statistics snapshot in, scored queue out. The persisted set is
//! replaced atomically, so a failed rebuild leaves the prior queue
//! untouched and rebuilding is safely re-invocable.

use chrono::{DateTime, Utc};

use crate::scheduler;
use crate::storage::{Result, Storage};
use crate::vocab::{QueueItem, WordStats};

/// Minimum priority score a word needs to enter the queue. Words below
/// the floor are left out entirely, not merely deprioritized.
pub const PRIORITY_FLOOR: f64 = 30.0;

/// Rebuild a user's review queue from their current statistics.
///
/// Returns how many words were queued. Any storage failure aborts the
/// whole rebuild; no partial queue is ever written.
pub fn rebuild_queue(storage: &Storage, user_id: &str) -> Result<usize> {
    let stats = storage.load_word_stats(user_id)?;
    let items = build_queue_items(&stats, user_id, Utc::now());

    storage.replace_queue(user_id, &items)?;

    tracing::debug!(
        user_id,
        queued = items.len(),
        scanned = stats.len(),
        "review queue rebuilt"
    );
    Ok(items.len())
}

/// Score a statistics snapshot into queue rows, dropping everything
/// under [`PRIORITY_FLOOR`].
fn build_queue_items(stats: &[WordStats], user_id: &str, now: DateTime<Utc>) -> Vec<QueueItem> {
    let mut items = Vec::with_capacity(stats.len());
    for word in stats {
        let (score, reason) = scheduler::score(word, now);
        if score < PRIORITY_FLOOR {
            continue;
        }
        items.push(QueueItem {
            user_id: user_id.to_string(),
            word_id: word.word_id.clone(),
            priority_score: score,
            reason: reason.to_string(),
        });
    }
    items
}

// ============================================================================
// TESTS
// ============================================================================
