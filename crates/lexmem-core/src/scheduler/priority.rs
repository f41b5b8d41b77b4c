//! Memory Priority Score (MPS)
//!
//! Converts a read-only per-word statistics snapshot into a bounded
//! 0-100 urgency score plus a short learner-facing reason. Pure
//! function: no I/O, no error path, deterministic for a given `now`.
//!
//! The score is a weighted sum of five factors, each normalized to
//! [0, 1] before weighting:
//!
//! | factor     | signal                              | weight |
//! |------------|-------------------------------------|--------|
//! | time       | days since last review, capped at 7 | 30     |
//! | accuracy   | 1 - lifetime accuracy rate          | 30     |
//! | confidence | inverted self-rating (1-5)          | 15     |
//! | failure    | failure rate in the recent window   | 15     |
//! | frequency  | corpus frequency of the word        | 10     |

use chrono::{DateTime, Utc};

use crate::vocab::WordStats;

/// Factor weights for the priority score.
pub mod weights {
    /// Weight for time since the last review.
    pub const TIME: f64 = 30.0;
    /// Weight for lifetime accuracy.
    pub const ACCURACY: f64 = 30.0;
    /// Weight for self-rated confidence.
    pub const CONFIDENCE: f64 = 15.0;
    /// Weight for failures inside the recent window.
    pub const FAILURE: f64 = 15.0;
    /// Weight for corpus frequency.
    pub const FREQUENCY: f64 = 10.0;
}

/// Days assumed to have passed when a word has never been reviewed.
/// Saturates the time factor.
pub const NEVER_REVIEWED_DAYS: i64 = 999;

/// Length of the "recent" review window feeding the failure factor.
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Days after which the time factor saturates at 1.0.
const TIME_SATURATION_DAYS: f64 = 7.0;

/// Lower bound of the score range.
pub const MIN_SCORE: f64 = 0.0;

/// Upper bound of the score range.
pub const MAX_SCORE: f64 = 100.0;

/// Compute the priority score and its reason for one word.
///
/// The reason is advisory text only; it never feeds back into the
/// numeric score.
pub fn score(stats: &WordStats, now: DateTime<Utc>) -> (f64, &'static str) {
    let days = days_since_review(stats, now);
    let time_factor = (days as f64 / TIME_SATURATION_DAYS).min(1.0);
    let accuracy_factor = 1.0 - stats.accuracy_rate;
    let confidence_factor = (5 - stats.confidence) as f64 / 4.0;
    let failure_factor = if stats.recent_reviews > 0 {
        stats.recent_failures as f64 / stats.recent_reviews as f64
    } else {
        0.0
    };

    let raw = time_factor * weights::TIME
        + accuracy_factor * weights::ACCURACY
        + confidence_factor * weights::CONFIDENCE
        + failure_factor * weights::FAILURE
        + stats.frequency_score * weights::FREQUENCY;

    let reason = reason_for(time_factor, accuracy_factor, confidence_factor, failure_factor);

    (raw.clamp(MIN_SCORE, MAX_SCORE), reason)
}

/// Whole days since the last review, floored at zero for timestamps in
/// the future. A word never reviewed reports [`NEVER_REVIEWED_DAYS`].
fn days_since_review(stats: &WordStats, now: DateTime<Utc>) -> i64 {
    match stats.last_reviewed_at {
        Some(last) => ((now - last).num_hours() / 24).max(0),
        None => NEVER_REVIEWED_DAYS,
    }
}

/// Pick the displayed reason. Fixed priority chain, first match wins.
fn reason_for(
    time_factor: f64,
    accuracy_factor: f64,
    confidence_factor: f64,
    failure_factor: f64,
) -> &'static str {
    if accuracy_factor > 0.5 {
        "You often answer this incorrectly"
    } else if failure_factor > 0.4 {
        "You recently made mistakes with this word"
    } else if time_factor > 0.7 {
        "You haven’t reviewed this word recently"
    } else if confidence_factor > 0.5 {
        "You marked this word as low confidence"
    } else {
        "This word needs a quick refresh"
    }
}

// ============================================================================
// TESTS
// ============================================================================
