//! Integration Tests Module
//!
//! End-to-end coverage of the workflow engine: TODO construction,
//! dependency resolution, the retry/verify state machine, the verification
//! subsystem, and the workflow façade, all driven through mock collaborators.

// Shared mock collaborators (scripted LLM, media tool provider)
mod support;

// TODO construction: complexity bounds, mode, criteria enhancement
mod builder_test;

// Graph resolution: ordering, cycles, determinism
mod dependency_test;

// Verifier degradation and adaptive aggregation
mod verification_test;

// Executor state machine: retries, skip cascade, chaining, cancellation
mod executor_test;

// Workflow façade: session validation, metrics, full runs
mod workflow_test;
