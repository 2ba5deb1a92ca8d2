//! Planning
//!
//! Per-item tool selection (`ToolPlanner`) and TODO-level strategy selection
//! (`AdaptivePlanner`). Planning never mutates items; the executor owns all
//! state transitions.

pub mod adaptive;
pub mod tool_planner;

pub use adaptive::{AdaptivePlanner, OptimizationHint, PlanOutcome, PlanStrategy, PlannedItem};
pub use tool_planner::{ToolPlan, ToolPlanner};
