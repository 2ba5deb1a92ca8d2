//! Todo Builder
//!
//! Builds the TODO aggregate for one user request: scores complexity,
//! generates work items (minimum one wrapping the whole request), and
//! enhances each item's success criteria through keyword-keyed rules.

use std::sync::Arc;

use regex::Regex;
use tracing::{debug, warn};

use crate::services::todo::complexity::{
    score_complexity, ComplexityEstimator, ComplexityWeights, DEFAULT_COMPLEXITY,
};
use crate::services::todo::types::{ExecutionProgress, ItemId, Todo, TodoMode, WorkItem};
use crate::utils::error::EngineResult;
use crate::utils::ids;

/// Default criteria keep at most this many characters of the action text.
const CRITERIA_ACTION_TRUNCATION: usize = 120;

// ============================================================================
// Build Inputs
// ============================================================================

/// Pre-decomposed work item supplied by the caller.
///
/// Hosts that decompose requests themselves (an LLM planner, a form UI) pass
/// drafts; otherwise the builder wraps the whole request into one item.
#[derive(Debug, Clone, Default)]
pub struct ItemDraft {
    pub action: String,
    pub tools_needed: Vec<String>,
    pub mcp_servers: Vec<String>,
    pub parameters: serde_json::Map<String, serde_json::Value>,
    pub success_criteria: Option<String>,
    pub dependencies: Vec<ItemId>,
}

impl ItemDraft {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    pub fn with_dependencies(mut self, dependencies: Vec<ItemId>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn with_success_criteria(mut self, criteria: impl Into<String>) -> Self {
        self.success_criteria = Some(criteria.into());
        self
    }

    pub fn with_tools_needed(mut self, tools: Vec<String>) -> Self {
        self.tools_needed = tools;
        self
    }

    pub fn with_mcp_servers(mut self, servers: Vec<String>) -> Self {
        self.mcp_servers = servers;
        self
    }

    pub fn with_parameters(
        mut self,
        parameters: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        self.parameters = parameters;
        self
    }
}

/// Options for one build call.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Attempt budget applied to every generated item
    pub max_attempts: u32,
    /// When true, estimator failures abort the build instead of degrading
    pub strict: bool,
    /// Pre-decomposed items; empty means "one item wrapping the request"
    pub items: Vec<ItemDraft>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            strict: false,
            items: Vec::new(),
        }
    }
}

// ============================================================================
// Criteria Rules
// ============================================================================

/// Criteria augmentation rule keyed by an action keyword set.
///
/// When `keywords` matches the item's action and `marker` does not already
/// appear in the criteria, `clause` is appended.
pub struct CriteriaRule {
    keywords: Regex,
    marker: Regex,
    clause: String,
}

impl CriteriaRule {
    pub fn new(keywords: &str, marker: &str, clause: impl Into<String>) -> Option<Self> {
        Some(Self {
            keywords: Regex::new(keywords).ok()?,
            marker: Regex::new(marker).ok()?,
            clause: clause.into(),
        })
    }

    fn apply(&self, action: &str, criteria: &mut String) {
        if self.keywords.is_match(action) && !self.marker.is_match(criteria) {
            if !criteria.is_empty() && !criteria.trim_end().ends_with('.') {
                criteria.push('.');
            }
            if !criteria.is_empty() {
                criteria.push(' ');
            }
            criteria.push_str(&self.clause);
        }
    }
}

fn default_rules() -> Vec<CriteriaRule> {
    [
        CriteriaRule::new(
            r"(?i)\b(watch|video|movie|film|play)\b",
            r"(?i)\bplayback\b|\bplaying\b",
            "Playback must be visibly in progress.",
        ),
        CriteriaRule::new(
            r"(?i)\bfull[ -]?screen\b",
            r"(?i)\bfull[ -]?screen\b",
            "Fullscreen mode must be confirmed active.",
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}

// ============================================================================
// TodoBuilder
// ============================================================================

/// Builds TODO aggregates from user messages.
pub struct TodoBuilder {
    estimator: Option<Arc<dyn ComplexityEstimator>>,
    weights: ComplexityWeights,
    rules: Vec<CriteriaRule>,
}

impl Default for TodoBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoBuilder {
    /// Builder with the heuristic scorer and the default criteria rules.
    pub fn new() -> Self {
        Self {
            estimator: None,
            weights: ComplexityWeights::default(),
            rules: default_rules(),
        }
    }

    /// Replace the heuristic with a pluggable estimator (e.g. LLM-backed).
    pub fn with_estimator(mut self, estimator: Arc<dyn ComplexityEstimator>) -> Self {
        self.estimator = Some(estimator);
        self
    }

    /// Override the heuristic weight table.
    pub fn with_weights(mut self, weights: ComplexityWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Add a criteria augmentation rule.
    pub fn with_rule(mut self, rule: CriteriaRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Build a TODO from the user's message.
    ///
    /// Estimator failures degrade to `DEFAULT_COMPLEXITY` unless
    /// `options.strict` is set, in which case the build error propagates.
    pub async fn build(&self, user_message: &str, options: &BuildOptions) -> EngineResult<Todo> {
        let complexity = match &self.estimator {
            Some(estimator) => match estimator.estimate(user_message).await {
                Ok(complexity) => complexity,
                Err(err) if options.strict => return Err(err),
                Err(err) => {
                    warn!(error = %err, "complexity estimator failed, defaulting to {DEFAULT_COMPLEXITY}");
                    DEFAULT_COMPLEXITY
                }
            },
            None => score_complexity(user_message, &self.weights),
        };
        let complexity = complexity.clamp(1, 10);

        let items = if options.items.is_empty() {
            vec![self.generate_item(1, ItemDraft::new(user_message), options.max_attempts)]
        } else {
            options
                .items
                .iter()
                .enumerate()
                .map(|(index, draft)| {
                    self.generate_item(index as ItemId + 1, draft.clone(), options.max_attempts)
                })
                .collect()
        };

        debug!(
            complexity,
            items = items.len(),
            "built todo from user message"
        );

        Ok(Todo {
            id: ids::todo_id(),
            request: user_message.to_string(),
            mode: TodoMode::for_complexity(complexity),
            complexity,
            items,
            execution: ExecutionProgress::default(),
            created_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    fn generate_item(&self, id: ItemId, draft: ItemDraft, max_attempts: u32) -> WorkItem {
        let mut criteria = draft
            .success_criteria
            .unwrap_or_else(|| default_criteria(&draft.action));
        for rule in &self.rules {
            rule.apply(&draft.action, &mut criteria);
        }

        WorkItem {
            id,
            action: draft.action,
            tools_needed: draft.tools_needed,
            mcp_servers: draft.mcp_servers,
            parameters: draft.parameters,
            success_criteria: criteria,
            dependencies: draft.dependencies,
            attempt: 1,
            max_attempts,
            status: crate::services::todo::types::ItemStatus::Pending,
        }
    }
}

/// Truncated restatement of the action.
fn default_criteria(action: &str) -> String {
    let truncated: String = action.chars().take(CRITERIA_ACTION_TRUNCATION).collect();
    format!("Completed: {truncated}")
}

// ============================================================================
// Tests
// ============================================================================
