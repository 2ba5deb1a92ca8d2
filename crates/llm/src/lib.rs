//! Taskweave LLM
//!
//! The LLM collaborator boundary for the workflow engine. Concrete provider
//! implementations (HTTP clients, local runtimes) live in host applications;
//! the engine only depends on the `LlmClient` trait defined here plus the
//! response-parsing helpers.
//!
//! ## Module Organization
//!
//! - `types` - Message, response, and error types
//! - `client` - The `LlmClient` trait (`chat` + `analyze`)
//! - `json` - Extraction of JSON objects from free-form model output

pub mod client;
pub mod json;
pub mod types;

// ── Client Trait ───────────────────────────────────────────────────────
pub use client::LlmClient;

// ── Types ──────────────────────────────────────────────────────────────
pub use types::{LlmError, LlmResponse, LlmResult, Message, MessageRole};

// ── JSON Helpers ───────────────────────────────────────────────────────
pub use json::{extract_json_object, extract_json_value};
