//! Adaptive Planner
//!
//! Chooses an execution strategy from the TODO's complexity, requests a
//! per-item tool plan, and applies the dependency resolver's ordering.
//! Strategy-specific optimization hints are annotations for the host; they
//! change nothing about planning itself.
//!
//! A dependency cycle is a hard stop here: the outcome reports
//! `success: false` and the caller must not proceed to execution.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use taskweave_core::Session;

use crate::services::dependency::DependencyResolver;
use crate::services::planner::tool_planner::ToolPlanner;
use crate::services::todo::types::{ItemId, Todo};

// ============================================================================
// Strategy
// ============================================================================

/// Execution strategy selected from complexity alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStrategy {
    Direct,
    Sequential,
    Parallel,
    Advanced,
}

impl PlanStrategy {
    /// The dispatch table: ≤3 direct, ≤6 sequential, ≤8 parallel, else advanced.
    pub fn for_complexity(complexity: u8) -> Self {
        match complexity {
            0..=3 => PlanStrategy::Direct,
            4..=6 => PlanStrategy::Sequential,
            7..=8 => PlanStrategy::Parallel,
            _ => PlanStrategy::Advanced,
        }
    }
}

impl std::fmt::Display for PlanStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanStrategy::Direct => write!(f, "direct"),
            PlanStrategy::Sequential => write!(f, "sequential"),
            PlanStrategy::Parallel => write!(f, "parallel"),
            PlanStrategy::Advanced => write!(f, "advanced"),
        }
    }
}

/// Strategy-specific annotation for the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationHint {
    /// Reuse tool listings across items
    Caching,
    /// Group tool invocations where the provider supports it
    Batching,
    /// Items that may run concurrently, batch by batch
    ParallelGroups(Vec<Vec<ItemId>>),
}

// ============================================================================
// Outcome
// ============================================================================

/// Tool plan summary for one item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedItem {
    pub item_id: ItemId,
    /// Names of the tools selected for this item
    pub tools: Vec<String>,
}

/// Result of planning one TODO.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub success: bool,
    pub strategy: PlanStrategy,
    /// Per-item plans in execution order; empty unless `success`
    pub items: Vec<PlannedItem>,
    /// Topological execution order
    pub dependencies: Vec<ItemId>,
    pub optimizations: Vec<OptimizationHint>,
    pub error: Option<String>,
}

// ============================================================================
// AdaptivePlanner
// ============================================================================

/// Strategy selection and per-item planning over one TODO.
pub struct AdaptivePlanner {
    tool_planner: ToolPlanner,
}

impl AdaptivePlanner {
    pub fn new(tool_planner: ToolPlanner) -> Self {
        Self { tool_planner }
    }

    pub async fn plan(&self, todo: &Todo, session: &Session) -> PlanOutcome {
        let strategy = PlanStrategy::for_complexity(todo.complexity);
        let resolution = DependencyResolver::resolve(&todo.items);

        if !resolution.success {
            let mut problems = Vec::new();
            if !resolution.cycles.is_empty() {
                problems.push(format!("dependency cycles: {:?}", resolution.cycles));
            }
            if !resolution.unknowns.is_empty() {
                problems.push(format!("unknown dependencies: {:?}", resolution.unknowns));
            }
            let error = problems.join("; ");
            warn!(todo = %todo.id, %error, "planning aborted");

            return PlanOutcome {
                success: false,
                strategy,
                items: Vec::new(),
                dependencies: Vec::new(),
                optimizations: Vec::new(),
                error: Some(error),
            };
        }

        let mut items = Vec::with_capacity(resolution.order.len());
        for &item_id in &resolution.order {
            if let Some(item) = todo.item(item_id) {
                let plan = self.tool_planner.plan(item, session).await;
                items.push(PlannedItem {
                    item_id,
                    tools: plan.tools.iter().map(|tool| tool.name.clone()).collect(),
                });
            }
        }

        let optimizations = match strategy {
            PlanStrategy::Direct => Vec::new(),
            PlanStrategy::Sequential => vec![OptimizationHint::Caching],
            PlanStrategy::Parallel | PlanStrategy::Advanced => vec![
                OptimizationHint::Caching,
                OptimizationHint::Batching,
                OptimizationHint::ParallelGroups(DependencyResolver::parallel_batches(
                    &todo.items,
                )),
            ],
        };

        debug!(todo = %todo.id, %strategy, items = items.len(), "plan ready");

        PlanOutcome {
            success: true,
            strategy,
            items,
            dependencies: resolution.order,
            optimizations,
            error: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
