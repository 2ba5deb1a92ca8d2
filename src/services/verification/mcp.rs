//! MCP Verifier
//!
//! Verifies execution results coming from tool providers. Preference order:
//!
//! 1. an injected `VerificationDelegate`
//! 2. a provider tool whose name matches `/verify|check|validate/i`
//! 3. a shape heuristic over the result's success indicator fields
//!
//! Each stage that malfunctions logs and falls to the next; no execution
//! result at all is an immediate `verified: false, confidence: 0`.

use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};
use tracing::{debug, warn};

use taskweave_core::Session;
use taskweave_tools::{ToolDescriptor, ToolProvider};

use crate::services::todo::types::WorkItem;
use crate::services::verification::confidence;
use crate::services::verification::types::{
    VerificationDelegate, VerificationMethod, VerificationResult, Verifier,
};
use crate::utils::error::EngineResult;

/// Result fields consulted by the shape heuristic.
const SUCCESS_FIELDS: [&str; 3] = ["success", "verified", "ok"];
const STATUS_SUCCESS_VALUES: [&str; 5] = ["success", "completed", "ok", "done", "passed"];

/// Tool-result based verifier.
pub struct McpVerifier {
    provider: Option<Arc<dyn ToolProvider>>,
    delegate: Option<Arc<dyn VerificationDelegate>>,
    tool_pattern: Regex,
}

impl McpVerifier {
    pub fn new(provider: Option<Arc<dyn ToolProvider>>) -> Self {
        Self {
            provider,
            delegate: None,
            tool_pattern: Regex::new(r"(?i)verify|check|validate").unwrap(),
        }
    }

    /// Inject a dedicated verification hook, preferred over everything else.
    pub fn with_delegate(mut self, delegate: Arc<dyn VerificationDelegate>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    /// First tool on the provider whose name looks like a verification tool,
    /// honoring the item's server restriction.
    async fn find_verification_tool(&self, item: &WorkItem) -> Option<ToolDescriptor> {
        let provider = self.provider.as_ref()?;
        let tools = if item.mcp_servers.is_empty() {
            provider.list_tools().await
        } else {
            provider.tools_from_servers(&item.mcp_servers).await
        };

        match tools {
            Ok(tools) => tools
                .into_iter()
                .find(|tool| self.tool_pattern.is_match(&tool.name)),
            Err(err) => {
                warn!(error = %err, "tool listing failed while looking for a verification tool");
                None
            }
        }
    }

    /// Interpret the payload a verification tool returned.
    fn interpret_tool_response(response: &Value) -> VerificationResult {
        let verified = success_indicator(response).unwrap_or(false);
        let reported_confidence = response
            .get("confidence")
            .and_then(Value::as_u64)
            .map(|c| c.min(100) as u8);
        let reason = response
            .get("reason")
            .and_then(Value::as_str)
            .unwrap_or("verification tool response")
            .to_string();

        let default_confidence = if verified {
            confidence::MCP_HEURISTIC_POSITIVE
        } else {
            confidence::MCP_HEURISTIC_NEGATIVE
        };

        let result = if verified {
            VerificationResult::pass(
                reported_confidence.unwrap_or(default_confidence),
                reason,
                VerificationMethod::Mcp,
            )
        } else {
            VerificationResult::fail(
                reported_confidence.unwrap_or(default_confidence),
                reason,
                VerificationMethod::Mcp,
            )
        };
        result.with_details(response.clone())
    }

    /// Shape heuristic over the raw execution result.
    fn heuristic(exec_result: &Value) -> VerificationResult {
        match success_indicator(exec_result) {
            Some(true) => VerificationResult::pass(
                confidence::MCP_HEURISTIC_POSITIVE,
                "result reports success",
                VerificationMethod::Mcp,
            ),
            Some(false) => VerificationResult::fail(
                confidence::MCP_HEURISTIC_NEGATIVE,
                "result reports failure",
                VerificationMethod::Mcp,
            ),
            None => VerificationResult::fail(
                confidence::MCP_HEURISTIC_NEGATIVE,
                "result carries no success indicator",
                VerificationMethod::Mcp,
            ),
        }
    }
}

/// Look for an explicit success indicator in the result shape. Results the
/// executor wraps as `{server, tool, output}` are inspected one level down.
fn success_indicator(value: &Value) -> Option<bool> {
    let object = value.as_object()?;

    for field in SUCCESS_FIELDS {
        if let Some(flag) = object.get(field).and_then(Value::as_bool) {
            return Some(flag);
        }
    }

    if let Some(status) = object.get("status").and_then(Value::as_str) {
        return Some(
            STATUS_SUCCESS_VALUES
                .iter()
                .any(|ok| status.eq_ignore_ascii_case(ok)),
        );
    }

    for nested in ["output", "result", "mcp_result"] {
        if let Some(inner) = object.get(nested) {
            if let Some(flag) = success_indicator(inner) {
                return Some(flag);
            }
        }
    }

    None
}

#[async_trait]
impl Verifier for McpVerifier {
    async fn verify(
        &self,
        item: &WorkItem,
        exec_result: Option<&Value>,
        _session: &Session,
    ) -> EngineResult<VerificationResult> {
        let Some(exec_result) = exec_result else {
            return Ok(VerificationResult::fail(
                confidence::NO_RESULT,
                "no execution result to inspect",
                VerificationMethod::Mcp,
            ));
        };

        if let Some(delegate) = &self.delegate {
            match delegate.verify(item, exec_result).await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    warn!(item = item.id, error = %err, "verification delegate failed, trying provider tool");
                }
            }
        }

        if let (Some(tool), Some(provider)) =
            (self.find_verification_tool(item).await, &self.provider)
        {
            let params = json!({
                "action": item.action,
                "successCriteria": item.success_criteria,
                "result": exec_result,
            });
            match provider.execute_tool(&tool.server, &tool.name, params).await {
                Ok(response) => {
                    debug!(item = item.id, tool = %tool.name, "verification tool responded");
                    return Ok(Self::interpret_tool_response(&response));
                }
                Err(err) => {
                    warn!(item = item.id, tool = %tool.name, error = %err, "verification tool failed, falling back to heuristic");
                }
            }
        }

        Ok(Self::heuristic(exec_result))
    }
}

// ============================================================================
// Tests
// ============================================================================
