//! Complexity Scoring
//!
//! Scores a request's complexity on a [1, 10] scale. The default path is a
//! pure heuristic driven by an explicit weight table so the formula stays
//! independently unit-testable; an LLM-backed estimator is a pluggable
//! replacement that must preserve the range and the default-5 fallback.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use taskweave_llm::{extract_json_value, LlmClient, Message};

use crate::utils::error::{EngineError, EngineResult};

/// Complexity used when an estimator fails: middle of the scale.
pub const DEFAULT_COMPLEXITY: u8 = 5;

/// Action keywords that each add `keyword_weight` to the score.
pub const ACTION_KEYWORDS: [&str; 7] = [
    "create", "modify", "delete", "refactor", "optimize", "debug", "test",
];

// ============================================================================
// Weight Table
// ============================================================================

/// Explicit weight table for the heuristic scorer.
#[derive(Debug, Clone)]
pub struct ComplexityWeights {
    /// Starting score
    pub base: f64,
    /// Sentence count is divided by this before being added
    pub sentence_divisor: f64,
    /// Upper bound on the sentence contribution
    pub sentence_cap: f64,
    /// Added once per recognized action keyword
    pub keyword_weight: f64,
    /// Added per fenced code block
    pub code_block_weight: f64,
}

impl Default for ComplexityWeights {
    fn default() -> Self {
        Self {
            base: 1.0,
            sentence_divisor: 2.0,
            sentence_cap: 3.0,
            keyword_weight: 0.5,
            code_block_weight: 2.0,
        }
    }
}

// ============================================================================
// Heuristic Scorer
// ============================================================================

/// Score a message's complexity. Pure function; always within [1, 10].
pub fn score_complexity(message: &str, weights: &ComplexityWeights) -> u8 {
    let mut score = weights.base;

    let sentence_count = message
        .split(['.', '!', '?'])
        .filter(|segment| !segment.trim().is_empty())
        .count();
    score += (sentence_count as f64 / weights.sentence_divisor).min(weights.sentence_cap);

    let lowered = message.to_lowercase();
    for keyword in ACTION_KEYWORDS {
        if lowered.contains(keyword) {
            score += weights.keyword_weight;
        }
    }

    let code_blocks = message.matches("```").count() / 2;
    score += code_blocks as f64 * weights.code_block_weight;

    score.round().clamp(1.0, 10.0) as u8
}

// ============================================================================
// Estimator Trait
// ============================================================================

/// Pluggable complexity estimation strategy.
#[async_trait]
pub trait ComplexityEstimator: Send + Sync {
    async fn estimate(&self, message: &str) -> EngineResult<u8>;
}

/// Default estimator: the weight-table heuristic. Never fails.
#[derive(Debug, Default)]
pub struct HeuristicEstimator {
    weights: ComplexityWeights,
}

impl HeuristicEstimator {
    pub fn new(weights: ComplexityWeights) -> Self {
        Self { weights }
    }
}

#[async_trait]
impl ComplexityEstimator for HeuristicEstimator {
    async fn estimate(&self, message: &str) -> EngineResult<u8> {
        Ok(score_complexity(message, &self.weights))
    }
}

// ============================================================================
// LLM Estimator
// ============================================================================

const COMPLEXITY_SYSTEM_PROMPT: &str = r#"You are a task analyst. Rate the complexity of the given request on a 1-10 scale where 1 is trivial and 10 requires extensive multi-step work.

Respond with ONLY valid JSON matching this schema:
{
  "complexity": 1-10,
  "reasoning": "Brief explanation"
}

No markdown fences, no explanatory text. Just the raw JSON object."#;

/// LLM-backed estimator with one repair retry on parse failure.
///
/// Callers treat any error from this estimator as a build failure and fall
/// back to `DEFAULT_COMPLEXITY`.
pub struct LlmComplexityEstimator {
    client: Arc<dyn LlmClient>,
}

impl LlmComplexityEstimator {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    fn parse(text: &str) -> Result<u8, String> {
        let value: Value = extract_json_value(text).map_err(|e| e.to_string())?;
        let complexity = value
            .get("complexity")
            .and_then(Value::as_f64)
            .ok_or_else(|| "missing numeric \"complexity\" field".to_string())?;
        Ok(complexity.round().clamp(1.0, 10.0) as u8)
    }
}

#[async_trait]
impl ComplexityEstimator for LlmComplexityEstimator {
    async fn estimate(&self, message: &str) -> EngineResult<u8> {
        let messages = vec![
            Message::system(COMPLEXITY_SYSTEM_PROMPT),
            Message::user(format!("Rate this request:\n{message}")),
        ];

        let response = self
            .client
            .chat(messages.clone())
            .await
            .map_err(|e| EngineError::build(format!("complexity estimation failed: {e}")))?;
        let text = response.text_content().unwrap_or_default().to_string();

        match Self::parse(&text) {
            Ok(complexity) => Ok(complexity),
            Err(first_error) => {
                debug!(error = %first_error, "complexity parse failed, retrying with repair prompt");

                let mut retry = messages;
                retry.push(Message::assistant(&text));
                retry.push(Message::user(format!(
                    "Your previous response could not be parsed: {first_error}. \
                     Respond with ONLY the raw JSON object, starting with {{ and ending with }}."
                )));

                let retry_response = self
                    .client
                    .chat(retry)
                    .await
                    .map_err(|e| EngineError::build(format!("complexity retry failed: {e}")))?;
                let retry_text = retry_response.text_content().unwrap_or_default();

                Self::parse(retry_text).map_err(|second_error| {
                    EngineError::build(format!(
                        "complexity response unparseable after retry. \
                         First error: {first_error}. Retry error: {second_error}"
                    ))
                })
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
