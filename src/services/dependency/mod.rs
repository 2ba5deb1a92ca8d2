//! Dependency Resolution
//!
//! Builds a directed graph from work item dependency lists, detects cycles,
//! and produces a deterministic topological execution order. Also derives
//! parallel batches and graph metrics for the adaptive planner.

mod resolver;

pub use resolver::{
    DependencyGraph, DependencyResolver, GraphMetrics, GraphNode, Resolution,
};
