//! Asynchronous Word Explanations
//!
//! Best-effort side channel: a detached task asks an OpenAI-compatible
//! chat endpoint for a learner-level explanation and stores the result.
//! Word creation never blocks on it and its failure never affects
//! scheduling; errors are logged and dropped.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use lexmem_core::{Storage, Word, WordExplanation};

use crate::config::AiConfig;

/// Attempts per word before giving up.
const MAX_ATTEMPTS: u32 = 2;

/// Outbound request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Explanation generation error.
#[derive(Debug, thiserror::Error)]
pub enum ExplainError {
    /// Transport or API failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Completion was not the JSON we asked for
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),
    /// Response carried no completion text
    #[error("empty completion")]
    EmptyCompletion,
    /// Completion parsed but failed validation
    #[error("explanation failed validation")]
    Invalid,
}

/// Explanation payload the model is asked to produce.
#[derive(Debug, Clone, Deserialize)]
pub struct Explanation {
    pub definition: String,
    pub example_good: String,
    #[serde(default)]
    pub example_bad: String,
    #[serde(default)]
    pub part_of_speech: String,
    #[serde(default)]
    pub cefr_level: String,
}

const SYSTEM_PROMPT: &str = "\
You are an English teacher for non-native learners.
Your explanations must be simple, clear, accurate, and suitable for CEFR A2-B1 learners.

Rules:
- Use simple English only
- Do NOT use the target word in the definition
- Explain only the most common meaning
- Avoid idioms and rare usages
- Keep sentences short
";

fn user_prompt(word: &str, context: &str) -> String {
    format!(
        "Word: \"{word}\"\n\
         Context sentence (if any): \"{context}\"\n\n\
         Task:\n\
         1. Give a simple definition\n\
         2. Give ONE correct example sentence\n\
         3. Give ONE incorrect or unnatural example sentence\n\
         4. State the part of speech\n\
         5. Guess CEFR level (A2, B1, or B2)\n\n\
         Output JSON only, with keys: definition, example_good, example_bad, part_of_speech, cefr_level."
    )
}

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct Explainer {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl Explainer {
    /// Build a client from the AI configuration.
    pub fn new(config: &AiConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    /// Generate a validated explanation, retrying once with a short
    /// backoff.
    pub async fn explain(&self, word: &str, context: &str) -> Result<Explanation, ExplainError> {
        let mut last_err = None;

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                tokio::time::sleep(Duration::from_secs(attempt as u64)).await;
            }

            match self.request(word, context).await {
                Ok(explanation) if validate(word, &explanation) => return Ok(explanation),
                Ok(_) => last_err = Some(ExplainError::Invalid),
                Err(err) => last_err = Some(err),
            }
        }

        Err(last_err.unwrap_or(ExplainError::Invalid))
    }

    async fn request(&self, word: &str, context: &str) -> Result<Explanation, ExplainError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_prompt(word, context) },
            ],
            "response_format": { "type": "json_object" },
        });

        let response: serde_json::Value = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(ExplainError::EmptyCompletion)?;

        Ok(serde_json::from_str(content)?)
    }
}

/// Reject empty, circular, or mislevelled explanations.
pub fn validate(word: &str, explanation: &Explanation) -> bool {
    if explanation.definition.is_empty() || explanation.example_good.is_empty() {
        return false;
    }

    // A definition built on the word itself teaches nothing
    if explanation
        .definition
        .to_lowercase()
        .contains(&word.to_lowercase())
    {
        return false;
    }

    matches!(explanation.cefr_level.as_str(), "A2" | "B1" | "B2")
}

/// Fire-and-forget generation for a freshly created word. Stores the
/// explanation when it arrives; logs and drops any failure.
pub fn spawn_explain(storage: Arc<Storage>, explainer: Arc<Explainer>, word: Word) {
    tokio::spawn(async move {
        let context = word.context.as_deref().unwrap_or("");

        match explainer.explain(&word.text, context).await {
            Ok(explanation) => {
                let record = WordExplanation {
                    word_id: word.id.clone(),
                    definition: explanation.definition,
                    example_good: explanation.example_good,
                    example_bad: (!explanation.example_bad.is_empty())
                        .then_some(explanation.example_bad),
                    part_of_speech: (!explanation.part_of_speech.is_empty())
                        .then_some(explanation.part_of_speech),
                    cefr_level: (!explanation.cefr_level.is_empty())
                        .then_some(explanation.cefr_level),
                    generated_at: chrono::Utc::now(),
                };
                if let Err(err) = storage.store_explanation(&record) {
                    tracing::warn!(word_id = %word.id, error = %err, "failed to store explanation");
                }
            }
            Err(err) => {
                tracing::warn!(word_id = %word.id, error = %err, "explanation generation failed");
            }
        }
    });
}

// ============================================================================
// TESTS
// ============================================================================
