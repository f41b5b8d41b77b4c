//! SQLite Storage Implementation
//!
//! Persistence for words, review history, and the ranked review queue.

use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

use crate::scheduler::{ReviewType, RECENT_WINDOW_DAYS};
use crate::vocab::{
    QueueItem, ReviewRecord, ReviewStats, Word, WordExplanation, WordStats, DEFAULT_CONFIDENCE,
    MAX_CONFIDENCE, MIN_CONFIDENCE,
};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),
    /// Record belongs to another user
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// Rejected input
    #[error("Invalid: {0}")]
    Invalid(String),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

/// Corpus frequency placeholder applied to every word until a real
/// frequency source exists.
const FREQUENCY_PLACEHOLDER: f64 = 0.5;

// ============================================================================
// STORAGE
// ============================================================================

/// Main storage struct.
///
/// Uses separate reader/writer connections for interior mutability.
/// All methods take `&self` (not `&mut self`), making Storage
/// `Send + Sync` so the HTTP layer can share an `Arc<Storage>`.
pub struct Storage {
    writer: Mutex<Connection>,
    reader: Mutex<Connection>,
}

impl Storage {
    /// Apply PRAGMAs to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;
             PRAGMA cache_size = -16000;",
        )?;

        Ok(())
    }

    /// Create new storage instance
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(p) => p,
            None => {
                let proj_dirs = ProjectDirs::from("com", "lexmem", "core").ok_or_else(|| {
                    StorageError::Init("Could not determine project directories".to_string())
                })?;

                let data_dir = proj_dirs.data_dir();
                std::fs::create_dir_all(data_dir)?;
                data_dir.join("lexmem.db")
            }
        };

        let writer_conn = Connection::open(&path)?;
        Self::configure_connection(&writer_conn)?;

        // Apply migrations on writer only
        super::migrations::apply_migrations(&writer_conn)?;

        let reader_conn = Connection::open(&path)?;
        Self::configure_connection(&reader_conn)?;

        Ok(Self {
            writer: Mutex::new(writer_conn),
            reader: Mutex::new(reader_conn),
        })
    }

    // ========================================================================
    // WORDS
    // ========================================================================

    /// Record a new word for a user
    pub fn create_word(
        &self,
        user_id: &str,
        text: &str,
        context: Option<String>,
    ) -> Result<Word> {
        if text.trim().is_empty() {
            return Err(StorageError::Invalid("word text must not be empty".into()));
        }

        let now = Utc::now();
        let word = Word {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            text: text.to_string(),
            context,
            confidence: DEFAULT_CONFIDENCE,
            created_at: now,
            updated_at: now,
        };

        let writer = self
            .writer
            .lock()
            .map_err(|_| StorageError::Init("Writer lock poisoned".into()))?;
        writer.execute(
            "INSERT INTO words (id, user_id, text, context, confidence, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                word.id,
                word.user_id,
                word.text,
                word.context,
                word.confidence,
                word.created_at.to_rfc3339(),
                word.updated_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!(word_id = %word.id, user_id, "word recorded");
        Ok(word)
    }

    /// Get a word by id, scoped to its owner
    pub fn get_word(&self, word_id: &str, user_id: &str) -> Result<Option<Word>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))?;
        let mut stmt = reader.prepare(
            "SELECT id, user_id, text, context, confidence, created_at, updated_at
             FROM words WHERE id = ?1 AND user_id = ?2",
        )?;

        let word = stmt
            .query_row(params![word_id, user_id], |row| Self::row_to_word(row))
            .optional()?;
        Ok(word)
    }

    /// List a user's words, newest first
    pub fn list_words(&self, user_id: &str, limit: i64, offset: i64) -> Result<Vec<Word>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))?;
        let mut stmt = reader.prepare(
            "SELECT id, user_id, text, context, confidence, created_at, updated_at
             FROM words WHERE user_id = ?1
             ORDER BY created_at DESC
             LIMIT ?2 OFFSET ?3",
        )?;

        let rows = stmt.query_map(params![user_id, limit, offset], |row| {
            Self::row_to_word(row)
        })?;

        let mut words = Vec::new();
        for word in rows {
            words.push(word?);
        }
        Ok(words)
    }

    /// Count a user's words
    pub fn count_words(&self, user_id: &str) -> Result<i64> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))?;
        let count = reader.query_row(
            "SELECT COUNT(*) FROM words WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Update the self-rated confidence of a word
    pub fn set_confidence(&self, word_id: &str, user_id: &str, confidence: i64) -> Result<Word> {
        if !(MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&confidence) {
            return Err(StorageError::Invalid(format!(
                "confidence must be between {MIN_CONFIDENCE} and {MAX_CONFIDENCE}"
            )));
        }

        let updated = {
            let writer = self
                .writer
                .lock()
                .map_err(|_| StorageError::Init("Writer lock poisoned".into()))?;
            writer.execute(
                "UPDATE words SET confidence = ?1, updated_at = ?2
                 WHERE id = ?3 AND user_id = ?4",
                params![confidence, Utc::now().to_rfc3339(), word_id, user_id],
            )?
        };

        if updated == 0 {
            return Err(StorageError::NotFound(word_id.to_string()));
        }

        self.get_word(word_id, user_id)?
            .ok_or_else(|| StorageError::NotFound(word_id.to_string()))
    }

    /// Delete a word and everything hanging off it
    pub fn delete_word(&self, word_id: &str, user_id: &str) -> Result<bool> {
        let writer = self
            .writer
            .lock()
            .map_err(|_| StorageError::Init("Writer lock poisoned".into()))?;
        let rows = writer.execute(
            "DELETE FROM words WHERE id = ?1 AND user_id = ?2",
            params![word_id, user_id],
        )?;
        Ok(rows > 0)
    }

    /// Attach a generated explanation to a word, replacing any earlier one
    pub fn store_explanation(&self, explanation: &WordExplanation) -> Result<()> {
        let writer = self
            .writer
            .lock()
            .map_err(|_| StorageError::Init("Writer lock poisoned".into()))?;
        writer.execute(
            "INSERT OR REPLACE INTO word_explanations
             (word_id, definition, example_good, example_bad, part_of_speech, cefr_level, generated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                explanation.word_id,
                explanation.definition,
                explanation.example_good,
                explanation.example_bad,
                explanation.part_of_speech,
                explanation.cefr_level,
                explanation.generated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get the generated explanation for a word, if one has arrived
    pub fn get_explanation(&self, word_id: &str) -> Result<Option<WordExplanation>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))?;
        let mut stmt = reader.prepare(
            "SELECT word_id, definition, example_good, example_bad, part_of_speech, cefr_level, generated_at
             FROM word_explanations WHERE word_id = ?1",
        )?;

        let explanation = stmt
            .query_row(params![word_id], |row| {
                let generated_at: String = row.get("generated_at")?;
                Ok(WordExplanation {
                    word_id: row.get("word_id")?,
                    definition: row.get("definition")?,
                    example_good: row.get("example_good")?,
                    example_bad: row.get("example_bad")?,
                    part_of_speech: row.get("part_of_speech")?,
                    cefr_level: row.get("cefr_level")?,
                    generated_at: Self::parse_timestamp(&generated_at, "generated_at")?,
                })
            })
            .optional()?;
        Ok(explanation)
    }

    // ========================================================================
    // REVIEWS
    // ========================================================================

    /// Record an answered quiz and fold it into the word's aggregates
    pub fn record_review(
        &self,
        user_id: &str,
        word_id: &str,
        result: bool,
        review_type: ReviewType,
    ) -> Result<ReviewRecord> {
        self.record_review_at(user_id, word_id, result, review_type, Utc::now())
    }

    /// Record an answered quiz with an explicit timestamp.
    ///
    /// The review insert and the aggregate upsert share one transaction
    /// so the aggregates can never drift from the history. The explicit
    /// timestamp exists for history imports.
    pub fn record_review_at(
        &self,
        user_id: &str,
        word_id: &str,
        result: bool,
        review_type: ReviewType,
        reviewed_at: DateTime<Utc>,
    ) -> Result<ReviewRecord> {
        let record = ReviewRecord {
            id: Uuid::new_v4().to_string(),
            word_id: word_id.to_string(),
            user_id: user_id.to_string(),
            result,
            review_type,
            reviewed_at,
        };

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| StorageError::Init("Writer lock poisoned".into()))?;
        let tx = writer.transaction()?;

        // The word must exist and belong to the reviewing user
        let owner: Option<String> = tx
            .query_row(
                "SELECT user_id FROM words WHERE id = ?1",
                params![word_id],
                |row| row.get(0),
            )
            .optional()?;
        match owner {
            None => return Err(StorageError::NotFound(word_id.to_string())),
            Some(owner) if owner != user_id => {
                return Err(StorageError::Forbidden(word_id.to_string()));
            }
            Some(_) => {}
        }

        let correct = i64::from(result);

        tx.execute(
            "INSERT INTO reviews (id, word_id, user_id, result, review_type, reviewed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.id,
                record.word_id,
                record.user_id,
                correct,
                record.review_type.as_str(),
                record.reviewed_at.to_rfc3339(),
            ],
        )?;

        tx.execute(
            "INSERT INTO review_stats (word_id, total_reviews, correct_reviews, last_reviewed_at, accuracy_rate)
             VALUES (?1, 1, ?2, ?3, ?4)
             ON CONFLICT(word_id) DO UPDATE SET
                 total_reviews = review_stats.total_reviews + 1,
                 correct_reviews = review_stats.correct_reviews + ?2,
                 last_reviewed_at = ?3,
                 accuracy_rate = CAST(review_stats.correct_reviews + ?2 AS REAL)
                     / (review_stats.total_reviews + 1)",
            params![
                record.word_id,
                correct,
                record.reviewed_at.to_rfc3339(),
                if result { 1.0 } else { 0.0 },
            ],
        )?;

        tx.commit()?;
        Ok(record)
    }

    /// Aggregate review statistics for a word. A word that was never
    /// reviewed reports empty aggregates rather than an error.
    pub fn get_review_stats(&self, word_id: &str) -> Result<ReviewStats> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))?;
        let mut stmt = reader.prepare(
            "SELECT total_reviews, correct_reviews, last_reviewed_at, accuracy_rate
             FROM review_stats WHERE word_id = ?1",
        )?;

        let stats = stmt
            .query_row(params![word_id], |row| {
                let last_reviewed_at: Option<String> = row.get("last_reviewed_at")?;
                Ok(ReviewStats {
                    word_id: word_id.to_string(),
                    total_reviews: row.get("total_reviews")?,
                    correct_reviews: row.get("correct_reviews")?,
                    last_reviewed_at: last_reviewed_at.and_then(Self::parse_timestamp_lenient),
                    accuracy_rate: row.get("accuracy_rate")?,
                })
            })
            .optional()?;

        Ok(stats.unwrap_or_else(|| ReviewStats::empty(word_id)))
    }

    /// Format used at the most recent review of a word
    pub fn get_last_review_type(&self, word_id: &str) -> Result<Option<ReviewType>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))?;
        let name: Option<String> = reader
            .query_row(
                "SELECT review_type FROM reviews
                 WHERE word_id = ?1
                 ORDER BY reviewed_at DESC
                 LIMIT 1",
                params![word_id],
                |row| row.get(0),
            )
            .optional()?;

        Ok(name.as_deref().and_then(ReviewType::parse_name))
    }

    // ========================================================================
    // SCHEDULING
    // ========================================================================

    /// Statistics snapshot for every word a user owns, feeding the
    /// priority scorer on queue rebuilds.
    pub fn load_word_stats(&self, user_id: &str) -> Result<Vec<WordStats>> {
        let window_start = (Utc::now() - Duration::days(RECENT_WINDOW_DAYS)).to_rfc3339();

        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))?;
        let mut stmt = reader.prepare(
            "WITH recent AS (
                 SELECT word_id,
                        COUNT(*) AS recent_reviews,
                        SUM(CASE WHEN result = 0 THEN 1 ELSE 0 END) AS recent_failures
                 FROM reviews
                 WHERE user_id = ?1 AND reviewed_at >= ?2
                 GROUP BY word_id
             )
             SELECT w.id AS word_id,
                    w.confidence,
                    COALESCE(rs.accuracy_rate, 0.0) AS accuracy_rate,
                    COALESCE(rs.total_reviews, 0) AS total_reviews,
                    rs.last_reviewed_at,
                    COALESCE(r.recent_failures, 0) AS recent_failures,
                    COALESCE(r.recent_reviews, 0) AS recent_reviews
             FROM words w
             LEFT JOIN review_stats rs ON rs.word_id = w.id
             LEFT JOIN recent r ON r.word_id = w.id
             WHERE w.user_id = ?1",
        )?;

        let rows = stmt.query_map(params![user_id, window_start], |row| {
            let last_reviewed_at: Option<String> = row.get("last_reviewed_at")?;
            Ok(WordStats {
                word_id: row.get("word_id")?,
                accuracy_rate: row.get("accuracy_rate")?,
                total_reviews: row.get("total_reviews")?,
                // A malformed timestamp reads as "never reviewed"
                last_reviewed_at: last_reviewed_at.and_then(Self::parse_timestamp_lenient),
                recent_failures: row.get("recent_failures")?,
                recent_reviews: row.get("recent_reviews")?,
                confidence: row.get("confidence")?,
                frequency_score: FREQUENCY_PLACEHOLDER,
            })
        })?;

        let mut stats = Vec::new();
        for row in rows {
            stats.push(row?);
        }
        Ok(stats)
    }

    /// Replace a user's queue in one transaction. On any failure the
    /// prior queue remains intact.
    pub fn replace_queue(&self, user_id: &str, items: &[QueueItem]) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| StorageError::Init("Writer lock poisoned".into()))?;
        let tx = writer.transaction()?;

        tx.execute(
            "DELETE FROM review_queue WHERE user_id = ?1",
            params![user_id],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO review_queue (user_id, word_id, priority_score, reason)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for item in items {
                stmt.execute(params![
                    item.user_id,
                    item.word_id,
                    item.priority_score,
                    item.reason,
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// A user's queue, highest priority first
    pub fn get_queue_items(&self, user_id: &str) -> Result<Vec<QueueItem>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))?;
        let mut stmt = reader.prepare(
            "SELECT user_id, word_id, priority_score, reason
             FROM review_queue
             WHERE user_id = ?1
             ORDER BY priority_score DESC, word_id",
        )?;

        let rows = stmt.query_map(params![user_id], |row| {
            Ok(QueueItem {
                user_id: row.get("user_id")?,
                word_id: row.get("word_id")?,
                priority_score: row.get("priority_score")?,
                reason: row.get("reason")?,
            })
        })?;

        let mut items = Vec::new();
        for item in rows {
            items.push(item?);
        }
        Ok(items)
    }

    // ========================================================================
    // ROW MAPPERS
    // ========================================================================

    /// Parse RFC3339 timestamp
    fn parse_timestamp(value: &str, field_name: &str) -> rusqlite::Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("Invalid {} timestamp '{}': {}", field_name, value, e),
                    )),
                )
            })
    }

    /// Parse RFC3339 timestamp, yielding None for malformed values
    fn parse_timestamp_lenient(value: String) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&value)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }

    /// Convert a row to Word
    fn row_to_word(row: &rusqlite::Row) -> rusqlite::Result<Word> {
        let created_at: String = row.get("created_at")?;
        let updated_at: String = row.get("updated_at")?;

        Ok(Word {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            text: row.get("text")?,
            context: row.get("context")?,
            confidence: row.get("confidence")?,
            created_at: Self::parse_timestamp(&created_at, "created_at")?,
            updated_at: Self::parse_timestamp(&updated_at, "updated_at")?,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
