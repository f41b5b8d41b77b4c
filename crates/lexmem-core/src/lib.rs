//! # Lexmem Core
//!
//! Adaptive review scheduling engine for vocabulary study:
//!
//! - **Memory Priority Score (MPS)**: converts per-word review statistics
//!   into a bounded 0-100 urgency score with a human-readable reason
//! - **Modality selection**: picks the next quiz format (mcq, match,
//!   typing, fill-in-the-blank) with a one-step anti-repetition fallback
//! - **Queue rebuilds**: recompute and atomically replace a user's ranked
//!   candidate set; low-priority words are filtered out entirely
//! - **Session assembly**: fill urgency-tiered, capacity-bounded study
//!   sessions from the ranked queue, driven by a forward-only cursor
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lexmem_core::{build_session, rebuild_queue, Storage};
//!
//! let storage = Storage::new(None)?;
//!
//! let word = storage.create_word(user_id, "ubiquitous", None)?;
//! storage.record_review(user_id, &word.id, true, lexmem_core::ReviewType::Mcq)?;
//!
//! rebuild_queue(&storage, user_id)?;
//! let mut session = build_session(&storage, user_id)?;
//!
//! while let Some(item) = session.current().cloned() {
//!     // present `item.review_type` quiz for `item.word_id` ...
//!     session.advance();
//! }
//! ```

// ============================================================================
// MODULES
// ============================================================================

pub mod queue;
pub mod scheduler;
pub mod session;
pub mod storage;
pub mod vocab;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Scheduling decisions
pub use scheduler::{
    score, select_type, selection_reason, ReviewContext, ReviewType, MAX_SCORE, MIN_SCORE,
    RECENT_WINDOW_DAYS,
};

// Queue rebuilds
pub use queue::{rebuild_queue, PRIORITY_FLOOR};

// Sessions
pub use session::{
    build_session, Session, SessionItem, SessionRegistry, CRITICAL_THRESHOLD, MAX_CRITICAL,
    MAX_NORMAL, NORMAL_THRESHOLD,
};

// Storage layer
pub use storage::{Result, Storage, StorageError, MIGRATIONS};

// Vocabulary domain types
pub use vocab::{
    QueueItem, ReviewRecord, ReviewStats, Word, WordExplanation, WordStats, DEFAULT_CONFIDENCE,
    MAX_CONFIDENCE, MIN_CONFIDENCE,
};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        build_session, rebuild_queue, score, select_type, QueueItem, Result, ReviewContext,
        ReviewType, Session, SessionItem, SessionRegistry, Storage, StorageError, Word, WordStats,
    };
}
