//! TODO Core Types
//!
//! Data structures for the workflow engine's root aggregate: the TODO, its
//! work items, and the mutable execution counters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sequence-local work item identifier, unique within one TODO.
pub type ItemId = u32;

// ============================================================================
// Status & Mode
// ============================================================================

/// Execution status of a single work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Waiting to be executed
    Pending,
    /// Currently running an attempt
    InProgress,
    /// Completed and verified
    Completed,
    /// Exhausted its attempt budget
    Failed,
    /// A dependency failed, was skipped, or never became ready
    Skipped,
}

impl ItemStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ItemStatus::Completed | ItemStatus::Failed | ItemStatus::Skipped
        )
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemStatus::Pending => write!(f, "pending"),
            ItemStatus::InProgress => write!(f, "in_progress"),
            ItemStatus::Completed => write!(f, "completed"),
            ItemStatus::Failed => write!(f, "failed"),
            ItemStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// TODO mode derived from complexity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoMode {
    Standard,
    Extended,
}

impl TodoMode {
    /// Extended iff complexity exceeds 6.
    pub fn for_complexity(complexity: u8) -> Self {
        if complexity > 6 {
            TodoMode::Extended
        } else {
            TodoMode::Standard
        }
    }
}

// ============================================================================
// WorkItem
// ============================================================================

/// One unit of work within a TODO.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    /// Sequence-local id, unique within the TODO
    pub id: ItemId,
    /// Free text describing intent
    pub action: String,
    /// Tool name hints (exact-match filter during planning)
    #[serde(default)]
    pub tools_needed: Vec<String>,
    /// Provider/server name hints (candidate pool restriction)
    #[serde(default)]
    pub mcp_servers: Vec<String>,
    /// Key/value parameters, may contain `{{...}}` placeholders
    #[serde(default)]
    pub parameters: Map<String, Value>,
    /// Always non-empty after criteria enhancement
    pub success_criteria: String,
    /// Items that must reach `completed` before this one may start
    #[serde(default)]
    pub dependencies: Vec<ItemId>,
    /// Current attempt counter, starts at 1
    pub attempt: u32,
    /// Attempt budget
    pub max_attempts: u32,
    /// Execution status, driven solely by the executor
    pub status: ItemStatus,
}

impl WorkItem {
    /// Create a pending item with default attempt budget.
    pub fn new(id: ItemId, action: impl Into<String>) -> Self {
        Self {
            id,
            action: action.into(),
            tools_needed: Vec::new(),
            mcp_servers: Vec::new(),
            parameters: Map::new(),
            success_criteria: String::new(),
            dependencies: Vec::new(),
            attempt: 1,
            max_attempts: 3,
            status: ItemStatus::Pending,
        }
    }

    pub fn with_dependencies(mut self, dependencies: Vec<ItemId>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn with_success_criteria(mut self, criteria: impl Into<String>) -> Self {
        self.success_criteria = criteria.into();
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
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

    pub fn with_parameters(mut self, parameters: Map<String, Value>) -> Self {
        self.parameters = parameters;
        self
    }
}

// ============================================================================
// Execution Progress
// ============================================================================

/// Mutable progress counters, owned by one executor run at a time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionProgress {
    /// Index of the item currently being processed
    pub current_index: usize,
    /// Items that reached `completed`
    pub completed: usize,
    /// Items that reached `failed`
    pub failed: usize,
    /// Attempts spent across all items
    pub total_attempts: u32,
}

// ============================================================================
// Todo
// ============================================================================

/// Root aggregate for one user request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Opaque id generated at creation
    pub id: String,
    /// Original request text
    pub request: String,
    /// Derived from complexity (`Extended` iff complexity > 6)
    pub mode: TodoMode,
    /// Clamped to [1, 10]
    pub complexity: u8,
    /// Ordered work items
    pub items: Vec<WorkItem>,
    /// Progress counters, mutated exclusively during one `execute()` call
    pub execution: ExecutionProgress,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl Todo {
    /// Look up an item by id.
    pub fn item(&self, id: ItemId) -> Option<&WorkItem> {
        self.items.iter().find(|item| item.id == id)
    }
}
