//! Verification Types
//!
//! The `VerificationResult` value object, the `Verifier` trait both
//! strategies implement, and the delegate hook hosts can inject.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use taskweave_core::Session;

use crate::services::todo::types::WorkItem;
use crate::services::verification::confidence;
use crate::utils::error::EngineResult;

/// Which verifier produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMethod {
    Mcp,
    Llm,
    Combined,
    Permissive,
}

impl std::fmt::Display for VerificationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationMethod::Mcp => write!(f, "mcp"),
            VerificationMethod::Llm => write!(f, "llm"),
            VerificationMethod::Combined => write!(f, "combined"),
            VerificationMethod::Permissive => write!(f, "permissive"),
        }
    }
}

/// Judgment over one execution attempt. Produced fresh per attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub verified: bool,
    /// Confidence in the judgment, 0-100
    pub confidence: u8,
    pub reason: String,
    pub method: VerificationMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl VerificationResult {
    /// Positive judgment.
    pub fn pass(confidence: u8, reason: impl Into<String>, method: VerificationMethod) -> Self {
        Self {
            verified: true,
            confidence: confidence.min(100),
            reason: reason.into(),
            method,
            details: None,
        }
    }

    /// Negative judgment.
    pub fn fail(confidence: u8, reason: impl Into<String>, method: VerificationMethod) -> Self {
        Self {
            verified: false,
            confidence: confidence.min(100),
            reason: reason.into(),
            method,
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Low-confidence negative standing in for a verifier that malfunctioned.
    pub fn from_verifier_error(error: impl std::fmt::Display, method: VerificationMethod) -> Self {
        Self::fail(
            confidence::VERIFIER_ERROR,
            format!("verifier error: {error}"),
            method,
        )
    }
}

/// One verification strategy.
#[async_trait]
pub trait Verifier: Send + Sync {
    /// Judge one execution result against the item's success criteria.
    ///
    /// `Err` means the verifier itself malfunctioned, not that verification
    /// determined failure; callers convert it via `from_verifier_error`.
    async fn verify(
        &self,
        item: &WorkItem,
        exec_result: Option<&Value>,
        session: &Session,
    ) -> EngineResult<VerificationResult>;
}

/// Host-injected verification hook, preferred over everything else by the
/// MCP verifier when present.
#[async_trait]
pub trait VerificationDelegate: Send + Sync {
    async fn verify(&self, item: &WorkItem, exec_result: &Value)
        -> EngineResult<VerificationResult>;
}
