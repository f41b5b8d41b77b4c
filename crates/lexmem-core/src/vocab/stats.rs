//! Review history types: raw records, per-word aggregates, the
//! scheduler's statistics snapshot, and persisted queue rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scheduler::ReviewType;

/// Read-only per-word statistics snapshot consumed by the priority
/// scorer. Recomputed from review history on every queue rebuild; it
/// has no independent lifecycle.
#[derive(Debug, Clone)]
pub struct WordStats {
    /// Word this snapshot describes
    pub word_id: String,
    /// Lifetime accuracy, 0.0 - 1.0
    pub accuracy_rate: f64,
    /// Lifetime review count
    pub total_reviews: i64,
    /// None when the word has never been reviewed
    pub last_reviewed_at: Option<DateTime<Utc>>,
    /// Failed reviews inside the recent window
    pub recent_failures: i64,
    /// Reviews inside the recent window
    pub recent_reviews: i64,
    /// Self-rated confidence, 1-5
    pub confidence: i64,
    /// Corpus frequency, 0.0 - 1.0
    pub frequency_score: f64,
}

/// One answered quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Word that was reviewed
    pub word_id: String,
    /// User who answered
    pub user_id: String,
    /// Whether the answer was correct
    pub result: bool,
    /// Quiz format that was presented
    pub review_type: ReviewType,
    /// When the answer was recorded
    pub reviewed_at: DateTime<Utc>,
}

/// Aggregate review statistics for one word.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    /// Word the aggregates describe
    pub word_id: String,
    /// Lifetime review count
    pub total_reviews: i64,
    /// Lifetime correct-answer count
    pub correct_reviews: i64,
    /// Most recent review, if any
    pub last_reviewed_at: Option<DateTime<Utc>>,
    /// correct_reviews / total_reviews, 0.0 when unreviewed
    pub accuracy_rate: f64,
}

impl ReviewStats {
    /// Aggregates for a word that has never been reviewed.
    pub fn empty(word_id: impl Into<String>) -> Self {
        Self {
            word_id: word_id.into(),
            total_reviews: 0,
            correct_reviews: 0,
            last_reviewed_at: None,
            accuracy_rate: 0.0,
        }
    }
}

/// A persisted row of the per-user ranked candidate queue. The whole
/// per-user set is replaced atomically on each rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    /// Owning user
    pub user_id: String,
    /// Candidate word
    pub word_id: String,
    /// Priority score, clamped to [0, 100]
    pub priority_score: f64,
    /// Why this word was queued
    pub reason: String,
}
