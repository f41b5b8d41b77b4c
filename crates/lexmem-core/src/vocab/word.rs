//! Word - the unit of vocabulary being learned

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest self-rated confidence (shaky).
pub const MIN_CONFIDENCE: i64 = 1;

/// Highest self-rated confidence (solid).
pub const MAX_CONFIDENCE: i64 = 5;

/// Confidence assigned to newly recorded words.
pub const DEFAULT_CONFIDENCE: i64 = 3;

/// A vocabulary word recorded by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// The word or phrase itself
    pub text: String,
    /// Sentence the word was encountered in, if the user recorded one
    pub context: Option<String>,
    /// Self-rated confidence, 1-5
    pub confidence: i64,
    /// When the word was recorded
    pub created_at: DateTime<Utc>,
    /// When the word was last modified
    pub updated_at: DateTime<Utc>,
}

/// Generated explanation attached to a word.
///
/// Produced out of band by the explanation collaborator; the scheduler
/// never reads it and word creation never waits for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordExplanation {
    /// Word this explanation belongs to
    pub word_id: String,
    /// Simple learner-level definition
    pub definition: String,
    /// One correct example sentence
    pub example_good: String,
    /// One incorrect or unnatural example sentence
    pub example_bad: Option<String>,
    /// Part of speech
    pub part_of_speech: Option<String>,
    /// Estimated CEFR level (A2, B1 or B2)
    pub cefr_level: Option<String>,
    /// When the explanation was generated
    pub generated_at: DateTime<Utc>,
}
