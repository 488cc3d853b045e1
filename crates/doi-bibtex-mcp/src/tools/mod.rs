//! MCP tool implementations.
//!
//! Each tool:
//! 1. Parses and validates input parameters
//! 2. Calls the DOI registry client
//! 3. Returns exactly one text result

mod bibtex;

pub use bibtex::{DoiToBibtexTool, convert};

use std::sync::Arc;

use crate::client::DoiClient;
use crate::error::ToolResult;

/// Tool execution context, shared by every transport.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Registry client.
    pub client: Arc<DoiClient>,
}

impl ToolContext {
    /// Create a new tool context.
    #[must_use]
    pub fn new(client: Arc<DoiClient>) -> Self {
        Self { client }
    }
}

/// Text produced by a tool call.
///
/// Conversion failures are still outputs (with `is_error` set), never transport faults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Result text: BibTeX on success, a single-line message on failure.
    pub text: String,
    /// Whether `text` describes a failure.
    pub is_error: bool,
}

impl ToolOutput {
    /// Successful output.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: false }
    }

    /// Failure output.
    #[must_use]
    pub fn failure(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: true }
    }
}

/// Trait for MCP tools.
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Tool name (e.g., "doi_to_bibtex").
    fn name(&self) -> &'static str;

    /// Tool description for LLM.
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters.
    fn input_schema(&self) -> serde_json::Value;

    /// Execute the tool with given input.
    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<ToolOutput>;
}

/// Register all tools.
#[must_use]
pub fn register_all_tools() -> Vec<Box<dyn McpTool>> {
    vec![Box::new(DoiToBibtexTool)]
}
