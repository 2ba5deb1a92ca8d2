//! TODO Construction
//!
//! Turns a raw user message into a TODO aggregate:
//! - Complexity scoring via an explicit weight table (heuristic default)
//!   with an optional LLM-backed estimator
//! - Work item generation (minimum one item wrapping the request)
//! - Success criteria enhancement through keyword-keyed rules

pub mod builder;
pub mod complexity;
pub mod types;

pub use builder::{BuildOptions, CriteriaRule, ItemDraft, TodoBuilder};
pub use complexity::{
    score_complexity, ComplexityEstimator, ComplexityWeights, HeuristicEstimator,
    LlmComplexityEstimator, DEFAULT_COMPLEXITY,
};
pub use types::{ExecutionProgress, ItemId, ItemStatus, Todo, TodoMode, WorkItem};
