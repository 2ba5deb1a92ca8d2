//! Confidence Constants
//!
//! Every default confidence the verifiers hand out lives here, named, so
//! tests can assert against the constant instead of a magic number.

/// Degraded modes (missing collaborator, no verifier at all) report this.
pub const OPTIMISTIC_DEFAULT: u8 = 50;

/// Shape heuristic found a positive success indicator.
pub const MCP_HEURISTIC_POSITIVE: u8 = 75;

/// Shape heuristic found a negative or no indicator.
pub const MCP_HEURISTIC_NEGATIVE: u8 = 25;

/// LLM keyword fallback found a positive keyword.
pub const LLM_KEYWORD_POSITIVE: u8 = 70;

/// LLM keyword fallback found nothing positive.
pub const LLM_KEYWORD_NEGATIVE: u8 = 30;

/// Primary verifier results at or below this fall through to the secondary.
pub const FALLTHROUGH_THRESHOLD: u8 = 70;

/// A verifier that malfunctioned is replaced by a negative at this level.
pub const VERIFIER_ERROR: u8 = 10;

/// No execution result at all.
pub const NO_RESULT: u8 = 0;
