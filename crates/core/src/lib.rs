//! Taskweave Core
//!
//! Foundational error types, session handle, and notification events for the
//! Taskweave workspace. This crate has zero dependencies on engine-level code
//! (planners, executors, LLM providers, tool providers).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `session` - Session identity and the type-map DI container (`Session`, `ServiceContainer`)
//! - `notify` - Notification sink trait and workflow progress events
//!
//! ## Design Principles
//!
//! 1. **Zero external dependencies beyond serde/thiserror** - keeps build times minimal
//! 2. **Trait-based abstractions** - enables mocking, testing, and future crate splitting
//! 3. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod error;
pub mod notify;
pub mod session;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Session & DI ───────────────────────────────────────────────────────
pub use session::{ServiceContainer, Session};

// ── Notifications ──────────────────────────────────────────────────────
pub use notify::{MemorySink, NotificationSink, NullSink, WorkflowEvent};
