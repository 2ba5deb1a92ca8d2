//! Tool Planner
//!
//! Selects the subset of available tools applicable to one work item.
//!
//! Two-stage restrict-then-filter: the item's `mcp_servers` restricts the
//! candidate pool first, then `tools_needed` filters by exact name inside
//! that pool. The restriction scope is preserved even when the name filter
//! matches nothing — there is no silent fallback to the full pool.
//!
//! Fails soft: a provider error yields an empty plan so the executor can
//! still attempt a no-tool completion path.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use taskweave_core::Session;
use taskweave_tools::{ToolDescriptor, ToolProvider};

use crate::services::todo::types::WorkItem;

/// Tools selected for one item, plus their schemas keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ToolPlan {
    pub tools: Vec<ToolDescriptor>,
    pub schemas: HashMap<String, Value>,
}

impl ToolPlan {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    fn from_tools(tools: Vec<ToolDescriptor>) -> Self {
        let schemas = tools
            .iter()
            .map(|tool| (tool.name.clone(), tool.input_schema.clone()))
            .collect();
        Self { tools, schemas }
    }
}

/// Plans tool usage for individual work items.
pub struct ToolPlanner {
    provider: Option<Arc<dyn ToolProvider>>,
}

impl ToolPlanner {
    pub fn new(provider: Option<Arc<dyn ToolProvider>>) -> Self {
        Self { provider }
    }

    /// Select applicable tools for the item.
    pub async fn plan(&self, item: &WorkItem, session: &Session) -> ToolPlan {
        let Some(provider) = &self.provider else {
            debug!(session = %session.id, item = item.id, "no tool provider, planning without tools");
            return ToolPlan::empty();
        };

        // Stage 1: restrict the candidate pool by declared servers
        let candidates = if item.mcp_servers.is_empty() {
            provider.list_tools().await
        } else {
            provider.tools_from_servers(&item.mcp_servers).await
        };

        let candidates = match candidates {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(session = %session.id, item = item.id, error = %err, "tool listing failed, planning without tools");
                return ToolPlan::empty();
            }
        };

        // Stage 2: filter by exact name within the restricted pool
        let selected = if item.tools_needed.is_empty() {
            candidates
        } else {
            candidates
                .into_iter()
                .filter(|tool| item.tools_needed.iter().any(|name| name == &tool.name))
                .collect()
        };

        debug!(
            session = %session.id,
            item = item.id,
            tools = selected.len(),
            "tool plan ready"
        );

        ToolPlan::from_tools(selected)
    }
}

// ============================================================================
// Tests
// ============================================================================
