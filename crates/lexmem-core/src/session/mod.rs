//! Study Sessions
//!
//! Turns the persisted, score-ranked queue into a bounded, ordered run
//! of review items. Items are filled greedily into two urgency tiers
//! with fixed capacities; a forward-only cursor then walks the result.
//! Live sessions are held in a [`SessionRegistry`].

mod registry;

pub use registry::SessionRegistry;

use serde::Serialize;

use crate::scheduler::{select_type, selection_reason, ReviewContext, ReviewType};
use crate::storage::{Result, Storage};

/// Capacity of the high-urgency tier.
pub const MAX_CRITICAL: usize = 5;

/// Capacity of the standard tier.
pub const MAX_NORMAL: usize = 5;

/// Minimum score for the high-urgency tier.
pub const CRITICAL_THRESHOLD: f64 = 60.0;

/// Minimum score for the standard tier.
pub const NORMAL_THRESHOLD: f64 = 40.0;

/// One quiz inside a session. Immutable once placed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionItem {
    /// Word to quiz
    pub word_id: String,
    /// Quiz format to present
    pub review_type: ReviewType,
    /// Priority score the word was queued with
    pub priority_score: f64,
    /// Composite learner-facing reason: why the word was queued, plus
    /// why this format was chosen
    pub reason: String,
}

/// A bounded, ordered run of review items with a forward-only cursor.
///
/// The item sequence is fixed at build time; the cursor only ever moves
/// forward and parks at the end. There is no restart: a new sitting
/// means building a new session.
#[derive(Debug, Clone)]
pub struct Session {
    user_id: String,
    items: Vec<SessionItem>,
    index: usize,
}

impl Session {
    /// Create a session positioned at the first item.
    pub fn new(user_id: impl Into<String>, items: Vec<SessionItem>) -> Self {
        Self {
            user_id: user_id.into(),
            items,
            index: 0,
        }
    }

    /// Owning user.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The full item sequence, in presentation order.
    pub fn items(&self) -> &[SessionItem] {
        &self.items
    }

    /// Number of items in the session.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the session holds no items at all.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cursor position, `0..=len`.
    pub fn position(&self) -> usize {
        self.index
    }

    /// The item under the cursor, or `None` once the session is done.
    pub fn current(&self) -> Option<&SessionItem> {
        self.items.get(self.index)
    }

    /// Move the cursor forward one item. No-op once done.
    pub fn advance(&mut self) {
        if self.index < self.items.len() {
            self.index += 1;
        }
    }

    /// Whether every item has been passed.
    pub fn done(&self) -> bool {
        self.index >= self.items.len()
    }
}

/// Assemble a session from a user's already-rebuilt queue.
///
/// Walks the queue in descending score order, filling the critical tier
/// (score >= 60) and then the normal tier (score >= 40) up to their
/// capacities; everything else stays in the persisted queue for a later
/// sitting. Critical items always precede normal items in the final
/// sequence, regardless of individual scores.
///
/// Callers are expected to [`crate::rebuild_queue`] first.
pub fn build_session(storage: &Storage, user_id: &str) -> Result<Session> {
    let queue = storage.get_queue_items(user_id)?;

    let mut critical: Vec<SessionItem> = Vec::with_capacity(MAX_CRITICAL);
    let mut normal: Vec<SessionItem> = Vec::with_capacity(MAX_NORMAL);

    for item in queue {
        let history = match storage.get_review_stats(&item.word_id) {
            Ok(stats) => stats,
            Err(err) => {
                tracing::debug!(
                    word_id = %item.word_id,
                    error = %err,
                    "skipping word with unreadable history"
                );
                continue;
            }
        };
        let last_review_type = storage.get_last_review_type(&item.word_id).ok().flatten();

        let ctx = ReviewContext {
            priority_score: item.priority_score,
            accuracy_rate: history.accuracy_rate,
            total_reviews: history.total_reviews,
            last_review_type,
        };
        let review_type = select_type(&ctx);
        let reason = format!("{}. {}", item.reason, selection_reason(&ctx, review_type));

        let placed = SessionItem {
            word_id: item.word_id,
            review_type,
            priority_score: item.priority_score,
            reason,
        };

        if placed.priority_score >= CRITICAL_THRESHOLD && critical.len() < MAX_CRITICAL {
            critical.push(placed);
        } else if placed.priority_score >= NORMAL_THRESHOLD && normal.len() < MAX_NORMAL {
            normal.push(placed);
        }

        if critical.len() == MAX_CRITICAL && normal.len() == MAX_NORMAL {
            break;
        }
    }

    tracing::debug!(
        user_id,
        critical = critical.len(),
        normal = normal.len(),
        "session assembled"
    );

    critical.extend(normal);
    Ok(Session::new(user_id, critical))
}

// ============================================================================
// TESTS
// ============================================================================
