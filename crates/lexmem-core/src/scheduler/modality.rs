//! Review Modality Selection
//!
//! Picks the quiz format for the next review of a word from the closed
//! set {mcq, match, typing, fill_blank}. Selection is a total, pure
//! function over the review context: an accuracy-tier chain picks a
//! base format, then a one-step fallback substitutes it if it would
//! repeat the format just used.

use serde::{Deserialize, Serialize};

/// Quiz format presented to the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewType {
    /// Multiple choice - recognize the meaning
    Mcq,
    /// Match words to meanings
    Match,
    /// Type the word from its meaning
    Typing,
    /// Use the word in a cloze sentence
    FillBlank,
}

impl ReviewType {
    /// Convert to the wire string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewType::Mcq => "mcq",
            ReviewType::Match => "match",
            ReviewType::Typing => "typing",
            ReviewType::FillBlank => "fill_blank",
        }
    }

    /// Parse from the wire string. Unknown names yield `None` so stale
    /// or foreign values degrade to "no previous format".
    pub fn parse_name(s: &str) -> Option<Self> {
        match s {
            "mcq" => Some(ReviewType::Mcq),
            "match" => Some(ReviewType::Match),
            "typing" => Some(ReviewType::Typing),
            "fill_blank" => Some(ReviewType::FillBlank),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReviewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-item context consulted when selecting the next modality.
/// Transient: built during session assembly, never persisted.
#[derive(Debug, Clone)]
pub struct ReviewContext {
    /// Priority score of the queue item this word came from
    pub priority_score: f64,
    /// Lifetime accuracy, 0.0 - 1.0
    pub accuracy_rate: f64,
    /// Lifetime review count
    pub total_reviews: i64,
    /// Format used at the most recent review, if any
    pub last_review_type: Option<ReviewType>,
}

/// Select the next quiz format for a word.
///
/// Accuracy tiers, first match wins: new words and low accuracy stay on
/// recognition (mcq); middling accuracy moves to matching; proven words
/// (accuracy above 0.8 across at least five reviews) escalate to cloze;
/// everything else gets typing.
pub fn select_type(ctx: &ReviewContext) -> ReviewType {
    let selected = if ctx.total_reviews == 0 {
        ReviewType::Mcq
    } else if ctx.accuracy_rate < 0.4 {
        ReviewType::Mcq
    } else if ctx.accuracy_rate < 0.7 {
        ReviewType::Match
    } else if ctx.accuracy_rate > 0.8 && ctx.total_reviews >= 5 {
        ReviewType::FillBlank
    } else {
        ReviewType::Typing
    };

    if Some(selected) == ctx.last_review_type {
        fallback(selected)
    } else {
        selected
    }
}

/// One-step substitution used when the base selection would repeat the
/// format just used. Mcq is its own terminus and may repeat.
fn fallback(t: ReviewType) -> ReviewType {
    match t {
        ReviewType::FillBlank => ReviewType::Typing,
        ReviewType::Typing => ReviewType::Match,
        ReviewType::Match => ReviewType::Mcq,
        ReviewType::Mcq => ReviewType::Mcq,
    }
}

/// Learner-facing encouragement for the selected format. Fixed lookup,
/// independent of the selection chain; a word with zero reviews gets a
/// distinct message even though its format coincides with the
/// low-accuracy branch.
pub fn selection_reason(ctx: &ReviewContext, selected: ReviewType) -> &'static str {
    match selected {
        ReviewType::Mcq => {
            if ctx.total_reviews == 0 {
                "This word is new — choose the correct meaning"
            } else {
                "Let’s reinforce recognition before recall"
            }
        }
        ReviewType::Match => "You recognize this word — let’s strengthen understanding",
        ReviewType::Typing => "You know this word — recall it without hints",
        ReviewType::FillBlank => "You’ve mastered this word — use it in context",
    }
}

// ============================================================================
// TESTS
// ============================================================================
