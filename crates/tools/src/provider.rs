//! Tool Provider Trait
//!
//! The provider is the engine's only view of external tooling: list tools,
//! restrict by server, execute by name. Transport details (MCP sessions,
//! in-process registries, RPC bridges) stay behind this trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::descriptor::{ToolDescriptor, ToolResult};

/// A source of executable tools grouped by server.
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// All tools this provider currently offers.
    async fn list_tools(&self) -> ToolResult<Vec<ToolDescriptor>>;

    /// Tools belonging to the named servers, preserving listing order.
    ///
    /// The default implementation filters `list_tools`; providers with a
    /// cheaper per-server lookup should override it.
    async fn tools_from_servers(&self, servers: &[String]) -> ToolResult<Vec<ToolDescriptor>> {
        let tools = self.list_tools().await?;
        Ok(tools
            .into_iter()
            .filter(|tool| servers.iter().any(|server| server == &tool.server))
            .collect())
    }

    /// Execute a named tool on a server with JSON parameters.
    async fn execute_tool(&self, server: &str, name: &str, params: Value) -> ToolResult<Value>;
}
