//! Tool Descriptors
//!
//! Identity and schema information for a tool, independent of how it is
//! executed. Descriptors are what planners see; invocation goes through the
//! provider.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Description of one tool offered by a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Unique tool name within its server (e.g., "browser_click").
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON schema describing input parameters.
    pub input_schema: Value,
    /// Server (provider group) this tool belongs to.
    pub server: String,
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
        server: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            server: server.into(),
        }
    }
}

/// Errors a tool provider may surface.
#[derive(Error, Debug)]
pub enum ToolError {
    /// No tool with that name on that server.
    #[error("Tool not found: {server}/{name}")]
    NotFound { server: String, name: String },

    /// The tool ran and failed.
    #[error("Tool execution failed: {message}")]
    Execution { message: String },

    /// The provider itself failed (listing, transport).
    #[error("Tool provider error: {message}")]
    Provider { message: String },
}

impl ToolError {
    pub fn not_found(server: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            server: server.into(),
            name: name.into(),
        }
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }
}

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;
