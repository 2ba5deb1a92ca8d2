//! Error Handling
//!
//! Engine-level error types layered over `taskweave_core::CoreError`.
//! Uses thiserror for ergonomic error definitions.
//!
//! Dependency cycles are deliberately NOT an error variant: the resolver
//! reports them as data (`Resolution { success: false, cycles }`) so
//! planners can decide whether to abort or degrade.

use taskweave_core::CoreError;
use thiserror::Error;

/// Engine-wide error type
#[derive(Error, Debug)]
pub enum EngineError {
    /// TODO construction failed (only from the optional LLM complexity call)
    #[error("Build error: {0}")]
    Build(String),

    /// A tool invocation failed during an execution attempt
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// A verifier itself malfunctioned (not "verification said no")
    #[error("Verification error: {0}")]
    Verification(String),

    /// WorkflowEngine precondition check failed
    #[error("Session validation error: {0}")]
    SessionValidation(String),

    /// Errors bubbled up from the core crate
    #[error(transparent)]
    Core(#[from] CoreError),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for engine errors
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Create a build error
    pub fn build(msg: impl Into<String>) -> Self {
        Self::Build(msg.into())
    }

    /// Create a tool execution error
    pub fn tool_execution(msg: impl Into<String>) -> Self {
        Self::ToolExecution(msg.into())
    }

    /// Create a verification error
    pub fn verification(msg: impl Into<String>) -> Self {
        Self::Verification(msg.into())
    }

    /// Create a session validation error
    pub fn session_validation(msg: impl Into<String>) -> Self {
        Self::SessionValidation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Convert EngineError to a string suitable for result-field reporting
impl From<EngineError> for String {
    fn from(err: EngineError) -> String {
        err.to_string()
    }
}
