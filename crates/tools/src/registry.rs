//! In-Memory Tool Registry
//!
//! Split definition/invocation traits plus a registry-backed `ToolProvider`:
//!
//! - `ToolSpec` - identity and schema (what planners need)
//! - `ToolInvoke` - execution capability
//! - `RegisteredTool` - combined trait (auto-implemented via blanket impl)
//! - `InMemoryToolProvider` - O(1) lookup with ordered iteration
//!
//! The split lets schema-only consumers avoid execution dependencies and
//! keeps test doubles cheap: mock the invoke side, reuse a real spec.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::descriptor::{ToolDescriptor, ToolError, ToolResult};
use crate::provider::ToolProvider;

// ============================================================================
// Trait Definitions
// ============================================================================

/// Tool identity and schema metadata.
pub trait ToolSpec: Send + Sync {
    /// Unique name of this tool within its server.
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// JSON schema describing input parameters.
    fn input_schema(&self) -> Value;

    /// Server this tool belongs to.
    fn server(&self) -> &str;

    /// Descriptor snapshot for planners.
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            self.name(),
            self.description(),
            self.input_schema(),
            self.server(),
        )
    }
}

/// Tool execution capability.
#[async_trait]
pub trait ToolInvoke: Send + Sync {
    /// Invoke the tool with JSON arguments matching its `input_schema`.
    async fn invoke(&self, params: Value) -> ToolResult<Value>;
}

/// Combined trait for tools that provide both spec and execution.
pub trait RegisteredTool: ToolSpec + ToolInvoke {}

// Blanket implementation: anything with both halves is registerable.
impl<T: ToolSpec + ToolInvoke> RegisteredTool for T {}

// ============================================================================
// FnTool
// ============================================================================

/// Closure-backed tool for hosts and tests.
pub struct FnTool {
    name: String,
    description: String,
    input_schema: Value,
    server: String,
    handler: Arc<dyn Fn(Value) -> ToolResult<Value> + Send + Sync>,
}

impl FnTool {
    pub fn new(
        server: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
        handler: impl Fn(Value) -> ToolResult<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            server: server.into(),
            handler: Arc::new(handler),
        }
    }
}

impl ToolSpec for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> Value {
        self.input_schema.clone()
    }

    fn server(&self) -> &str {
        &self.server
    }
}

#[async_trait]
impl ToolInvoke for FnTool {
    async fn invoke(&self, params: Value) -> ToolResult<Value> {
        (self.handler)(params)
    }
}

// ============================================================================
// InMemoryToolProvider
// ============================================================================

/// Registry-backed provider with deterministic iteration order.
///
/// Tools are keyed by `server/name`; registration replaces any existing tool
/// under the same key while keeping its original position.
#[derive(Default)]
pub struct InMemoryToolProvider {
    tools: HashMap<String, Arc<dyn RegisteredTool>>,
    /// Insertion order for deterministic listing.
    order: Vec<String>,
}

impl InMemoryToolProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(server: &str, name: &str) -> String {
        format!("{server}/{name}")
    }

    /// Register a tool. Replaces any existing tool with the same server/name.
    pub fn register(&mut self, tool: Arc<dyn RegisteredTool>) {
        let key = Self::key(tool.server(), tool.name());
        if !self.tools.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.tools.insert(key, tool);
    }

    /// Unregister a tool. Returns the removed tool, or None.
    pub fn unregister(&mut self, server: &str, name: &str) -> Option<Arc<dyn RegisteredTool>> {
        let key = Self::key(server, name);
        self.order.retain(|k| k != &key);
        self.tools.remove(&key)
    }

    /// Registered `server/name` keys in registration order.
    pub fn keys(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[async_trait]
impl ToolProvider for InMemoryToolProvider {
    async fn list_tools(&self) -> ToolResult<Vec<ToolDescriptor>> {
        Ok(self
            .order
            .iter()
            .filter_map(|key| self.tools.get(key))
            .map(|tool| tool.descriptor())
            .collect())
    }

    async fn execute_tool(&self, server: &str, name: &str, params: Value) -> ToolResult<Value> {
        match self.tools.get(&Self::key(server, name)) {
            Some(tool) => tool.invoke(params).await,
            None => Err(ToolError::not_found(server, name)),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
