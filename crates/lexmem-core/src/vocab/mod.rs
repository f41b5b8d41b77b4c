//! Vocabulary Domain Types
//!
//! Words, their generated explanations, and the review statistics the
//! scheduler consumes. Plain data; behavior lives in [`crate::scheduler`],
//! [`crate::queue`] and [`crate::session`].

mod stats;
mod word;

pub use stats::{QueueItem, ReviewRecord, ReviewStats, WordStats};
pub use word::{Word, WordExplanation, DEFAULT_CONFIDENCE, MAX_CONFIDENCE, MIN_CONFIDENCE};
