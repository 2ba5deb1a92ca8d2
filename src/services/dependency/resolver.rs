//! Dependency Resolver
//!
//! Graph construction, cycle detection, and topological ordering over work
//! items. The graph is rebuilt fresh per `resolve()` call and never shared;
//! cycles are reported as data so planners can decide to abort or degrade.
//!
//! Ordering is deterministic: whenever several items are ready, declaration
//! order wins.

use std::collections::{HashMap, HashSet};

use crate::services::todo::types::{ItemId, WorkItem};

// ============================================================================
// Graph Types
// ============================================================================

/// One node of the dependency graph.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: ItemId,
    /// Declared dependencies (known ids only)
    pub dependencies: Vec<ItemId>,
    /// Computed reverse edges
    pub dependents: Vec<ItemId>,
}

/// Ephemeral dependency graph, valid for one resolution call.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<GraphNode>,
    index: HashMap<ItemId, usize>,
}

impl DependencyGraph {
    /// Nodes in declaration order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn node(&self, id: ItemId) -> Option<&GraphNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn dependencies_of(&self, id: ItemId) -> &[ItemId] {
        self.node(id).map(|n| n.dependencies.as_slice()).unwrap_or(&[])
    }

    pub fn dependents_of(&self, id: ItemId) -> &[ItemId] {
        self.node(id).map(|n| n.dependents.as_slice()).unwrap_or(&[])
    }
}

/// Outcome of one resolution call.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// False when cycles or unknown dependency ids were found
    pub success: bool,
    /// Topological order; empty unless `success`
    pub order: Vec<ItemId>,
    /// The graph that was built
    pub graph: DependencyGraph,
    /// Back edges `(from, to)` found during cycle detection
    pub cycles: Vec<(ItemId, ItemId)>,
    /// Edges `(item, missing_dependency)` referencing ids outside the set
    pub unknowns: Vec<(ItemId, ItemId)>,
}

/// Metrics derived from the dependency graph.
#[derive(Debug, Clone)]
pub struct GraphMetrics {
    pub total_items: usize,
    pub total_dependencies: usize,
    pub batch_count: usize,
    /// Largest number of items executable at once
    pub max_parallel: usize,
    /// Longest dependency chain, dependent first
    pub critical_path: Vec<ItemId>,
}

// ============================================================================
// Resolver
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum VisitState {
    Unvisited,
    InStack,
    Done,
}

/// Dependency resolver over work items.
pub struct DependencyResolver;

impl DependencyResolver {
    /// Build the graph, detect cycles, and produce a topological order.
    pub fn resolve(items: &[WorkItem]) -> Resolution {
        let (graph, unknowns) = Self::build_graph(items);

        let cycles = Self::find_back_edges(&graph);
        if !cycles.is_empty() || !unknowns.is_empty() {
            return Resolution {
                success: false,
                order: Vec::new(),
                graph,
                cycles,
                unknowns,
            };
        }

        let order = Self::topological_order(&graph);

        Resolution {
            success: true,
            order,
            graph,
            cycles,
            unknowns,
        }
    }

    /// O(d) readiness check: every declared dependency is completed.
    pub fn can_execute(item: &WorkItem, completed: &HashSet<ItemId>) -> bool {
        item.dependencies.iter().all(|dep| completed.contains(dep))
    }

    /// Group items into batches where each batch only depends on earlier
    /// batches. Items inside a batch are mutually independent.
    pub fn parallel_batches(items: &[WorkItem]) -> Vec<Vec<ItemId>> {
        let (graph, _) = Self::build_graph(items);

        let mut in_degree: HashMap<ItemId, usize> = graph
            .nodes()
            .iter()
            .map(|node| (node.id, node.dependencies.len()))
            .collect();
        let mut remaining: Vec<ItemId> = graph.nodes().iter().map(|node| node.id).collect();
        let mut batches = Vec::new();

        while !remaining.is_empty() {
            let mut batch: Vec<ItemId> = remaining
                .iter()
                .copied()
                .filter(|id| in_degree.get(id).copied().unwrap_or(0) == 0)
                .collect();

            if batch.is_empty() {
                // Cycle remnants: surface them as one final batch rather
                // than dropping items silently
                batch = remaining.clone();
            }

            remaining.retain(|id| !batch.contains(id));
            for id in &batch {
                for &dependent in graph.dependents_of(*id) {
                    if let Some(degree) = in_degree.get_mut(&dependent) {
                        *degree = degree.saturating_sub(1);
                    }
                }
            }

            batches.push(batch);
        }

        batches
    }

    /// Edge counts, batch shape, and the critical path.
    pub fn metrics(items: &[WorkItem]) -> GraphMetrics {
        let (graph, _) = Self::build_graph(items);
        let batches = Self::parallel_batches(items);

        let total_dependencies = graph
            .nodes()
            .iter()
            .map(|node| node.dependencies.len())
            .sum();

        let mut critical_path = Vec::new();
        for node in graph.nodes() {
            let mut visiting = HashSet::new();
            let path = Self::longest_chain(node.id, &graph, &mut visiting);
            if path.len() > critical_path.len() {
                critical_path = path;
            }
        }

        GraphMetrics {
            total_items: graph.len(),
            total_dependencies,
            batch_count: batches.len(),
            max_parallel: batches.iter().map(Vec::len).max().unwrap_or(0),
            critical_path,
        }
    }

    /// Plain-text graph view for logs and debugging.
    pub fn render_ascii(items: &[WorkItem]) -> String {
        let mut output = String::from("Dependency Graph\n================\n\n");

        if items.is_empty() {
            output.push_str("(no items)\n");
            return output;
        }

        for (index, batch) in Self::parallel_batches(items).iter().enumerate() {
            let ids: Vec<String> = batch.iter().map(ItemId::to_string).collect();
            output.push_str(&format!("Batch {}: {}\n", index + 1, ids.join(", ")));
        }
        output.push('\n');

        let (graph, _) = Self::build_graph(items);
        for item in items {
            let icon = match item.status {
                crate::services::todo::types::ItemStatus::Completed => "[x]",
                crate::services::todo::types::ItemStatus::InProgress => "[~]",
                crate::services::todo::types::ItemStatus::Failed => "[!]",
                crate::services::todo::types::ItemStatus::Skipped => "[-]",
                crate::services::todo::types::ItemStatus::Pending => "[ ]",
            };
            output.push_str(&format!("{icon} {} - {}\n", item.id, item.action));

            if !item.dependencies.is_empty() {
                let deps: Vec<String> = item.dependencies.iter().map(ItemId::to_string).collect();
                output.push_str(&format!("    <- depends on: {}\n", deps.join(", ")));
            }
            let dependents = graph.dependents_of(item.id);
            if !dependents.is_empty() {
                let deps: Vec<String> = dependents.iter().map(ItemId::to_string).collect();
                output.push_str(&format!("    -> required by: {}\n", deps.join(", ")));
            }
        }

        output
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn build_graph(items: &[WorkItem]) -> (DependencyGraph, Vec<(ItemId, ItemId)>) {
        let known: HashSet<ItemId> = items.iter().map(|item| item.id).collect();
        let mut unknowns = Vec::new();

        let mut nodes: Vec<GraphNode> = items
            .iter()
            .map(|item| GraphNode {
                id: item.id,
                dependencies: Vec::new(),
                dependents: Vec::new(),
            })
            .collect();
        let index: HashMap<ItemId, usize> = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.id, i))
            .collect();

        for (i, item) in items.iter().enumerate() {
            for &dep in &item.dependencies {
                if known.contains(&dep) {
                    nodes[i].dependencies.push(dep);
                    let dep_index = index[&dep];
                    nodes[dep_index].dependents.push(item.id);
                } else {
                    unknowns.push((item.id, dep));
                }
            }
        }

        (DependencyGraph { nodes, index }, unknowns)
    }

    /// Collect every back edge via DFS with an explicit recursion stack state.
    fn find_back_edges(graph: &DependencyGraph) -> Vec<(ItemId, ItemId)> {
        let mut state: HashMap<ItemId, VisitState> = graph
            .nodes()
            .iter()
            .map(|node| (node.id, VisitState::Unvisited))
            .collect();
        let mut cycles = Vec::new();

        for node in graph.nodes() {
            if state[&node.id] == VisitState::Unvisited {
                Self::cycle_dfs(node.id, graph, &mut state, &mut cycles);
            }
        }

        cycles
    }

    fn cycle_dfs(
        current: ItemId,
        graph: &DependencyGraph,
        state: &mut HashMap<ItemId, VisitState>,
        cycles: &mut Vec<(ItemId, ItemId)>,
    ) {
        state.insert(current, VisitState::InStack);

        for &dep in graph.dependencies_of(current) {
            match state[&dep] {
                VisitState::InStack => cycles.push((current, dep)),
                VisitState::Unvisited => Self::cycle_dfs(dep, graph, state, cycles),
                VisitState::Done => {}
            }
        }

        state.insert(current, VisitState::Done);
    }

    /// DFS post-order emission: every dependency precedes its dependents.
    /// Roots are visited in declaration order, so ties are stable.
    fn topological_order(graph: &DependencyGraph) -> Vec<ItemId> {
        let mut visited: HashSet<ItemId> = HashSet::new();
        let mut order = Vec::with_capacity(graph.len());

        for node in graph.nodes() {
            Self::topo_dfs(node.id, graph, &mut visited, &mut order);
        }

        order
    }

    fn topo_dfs(
        current: ItemId,
        graph: &DependencyGraph,
        visited: &mut HashSet<ItemId>,
        order: &mut Vec<ItemId>,
    ) {
        if !visited.insert(current) {
            return;
        }
        for &dep in graph.dependencies_of(current) {
            Self::topo_dfs(dep, graph, visited, order);
        }
        order.push(current);
    }

    /// Longest dependency chain starting at `current`, dependent first.
    fn longest_chain(
        current: ItemId,
        graph: &DependencyGraph,
        visiting: &mut HashSet<ItemId>,
    ) -> Vec<ItemId> {
        if !visiting.insert(current) {
            return Vec::new();
        }

        let mut longest = vec![current];
        for &dep in graph.dependencies_of(current) {
            let path = Self::longest_chain(dep, graph, visiting);
            if path.len() + 1 > longest.len() {
                longest = vec![current];
                longest.extend(path);
            }
        }

        visiting.remove(&current);
        longest
    }
}

// ============================================================================
// Tests
// ============================================================================
