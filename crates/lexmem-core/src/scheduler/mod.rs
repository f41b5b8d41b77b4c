//! Review Scheduling Decisions
//!
//! The two pure decision functions of the engine: priority scoring
//! (stats snapshot -> bounded urgency score + reason) and modality
//! selection (review context -> next quiz format). Both are
//! deterministic, synchronous, and free of I/O; everything stateful
//! lives in [`crate::queue`] and [`crate::session`].

mod modality;
mod priority;

pub use modality::{select_type, selection_reason, ReviewContext, ReviewType};
pub use priority::{
    score, weights, MAX_SCORE, MIN_SCORE, NEVER_REVIEWED_DAYS, RECENT_WINDOW_DAYS,
};
