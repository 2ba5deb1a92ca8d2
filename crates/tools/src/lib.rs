//! Taskweave Tools
//!
//! The tool-provider collaborator boundary for the workflow engine. A
//! provider exposes named tools grouped by server; the engine lists them,
//! filters them per work item, and invokes them. Absence of a provider means
//! "tools unavailable" and is never treated as fatal.
//!
//! ## Module Organization
//!
//! - `descriptor` - `ToolDescriptor` and tool error types
//! - `provider` - The `ToolProvider` async trait
//! - `registry` - Split definition/invoke traits and `InMemoryToolProvider`

pub mod descriptor;
pub mod provider;
pub mod registry;

// ── Descriptors & Errors ───────────────────────────────────────────────
pub use descriptor::{ToolDescriptor, ToolError, ToolResult};

// ── Provider Trait ─────────────────────────────────────────────────────
pub use provider::ToolProvider;

// ── Registry ───────────────────────────────────────────────────────────
pub use registry::{FnTool, InMemoryToolProvider, RegisteredTool, ToolInvoke, ToolSpec};
