//! JSON-RPC 2.0 message types and MCP method dispatch.
//!
//! The [`Dispatcher`] is the single place where MCP methods are routed to tools.
//! The stdio and HTTP transports only frame messages around it.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::ToolError;
use crate::tools::{self, McpTool, ToolContext};

/// Protocol version answered when the client does not propose one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name announced during `initialize`.
pub const SERVER_NAME: &str = "doi-to-bibtex";

/// Standard JSON-RPC error codes.
pub mod codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
}

/// JSON-RPC 2.0 request.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
}

impl JsonRpcRequest {
    /// Notifications carry no id and receive no response.
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: Cow<'static, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 error.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcResponse {
    /// JSON-RPC version constant.
    const VERSION: &'static str = "2.0";

    #[must_use]
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self { jsonrpc: Cow::Borrowed(Self::VERSION), result: Some(result), error: None, id }
    }

    #[must_use]
    pub fn error(id: Option<serde_json::Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: Cow::Borrowed(Self::VERSION),
            result: None,
            error: Some(JsonRpcError { code, message: message.into(), data: None }),
            id,
        }
    }

    /// Response for a message that could not be parsed.
    #[must_use]
    pub fn parse_error(err: &serde_json::Error) -> Self {
        Self::error(None, codes::PARSE_ERROR, format!("Parse error: {err}"))
    }
}

/// MCP tool info for tools/list response.
#[derive(Debug, Serialize)]
pub struct McpToolInfo {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// Routes MCP methods to the registered tools.
pub struct Dispatcher {
    tools: Vec<Box<dyn McpTool>>,
    ctx: ToolContext,
}

impl Dispatcher {
    /// Create a dispatcher over all registered tools.
    #[must_use]
    pub fn new(ctx: ToolContext) -> Self {
        Self::with_tools(tools::register_all_tools(), ctx)
    }

    /// Create a dispatcher over a specific tool set.
    #[must_use]
    pub fn with_tools(tools: Vec<Box<dyn McpTool>>, ctx: ToolContext) -> Self {
        Self { tools, ctx }
    }

    /// Number of registered tools.
    #[must_use]
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Get tool by name.
    #[must_use]
    pub fn get_tool(&self, name: &str) -> Option<&dyn McpTool> {
        self.tools.iter().find(|t| t.name() == name).map(|t| t.as_ref())
    }

    /// Handle one JSON-RPC message. Returns `None` for notifications.
    pub async fn handle(&self, req: JsonRpcRequest) -> Option<JsonRpcResponse> {
        tracing::debug!(method = %req.method, "Dispatching request");

        if req.is_notification() {
            tracing::debug!(method = %req.method, "Notification received");
            return None;
        }

        if req.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                req.id,
                codes::INVALID_REQUEST,
                format!("Unsupported jsonrpc version: {}", req.jsonrpc),
            ));
        }

        let response = match req.method.as_str() {
            "initialize" => JsonRpcResponse::success(req.id, initialize_result(&req.params)),
            "ping" => JsonRpcResponse::success(req.id, serde_json::json!({})),
            "tools/list" => JsonRpcResponse::success(req.id, self.tools_list()),
            "tools/call" => self.tools_call(req.id, &req.params).await,
            _ => JsonRpcResponse::error(
                req.id,
                codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", req.method),
            ),
        };

        Some(response)
    }

    fn tools_list(&self) -> serde_json::Value {
        let tool_list: Vec<McpToolInfo> = self
            .tools
            .iter()
            .map(|t| McpToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect();

        serde_json::json!({ "tools": tool_list })
    }

    async fn tools_call(
        &self,
        id: Option<serde_json::Value>,
        params: &serde_json::Value,
    ) -> JsonRpcResponse {
        let Some(tool_name) = params.get("name").and_then(|v| v.as_str()) else {
            return JsonRpcResponse::error(id, codes::INVALID_PARAMS, "Missing 'name' parameter");
        };

        let Some(tool) = self.get_tool(tool_name) else {
            let err = ToolError::UnknownTool(tool_name.to_string());
            return JsonRpcResponse::error(id, codes::INVALID_PARAMS, err.to_user_message());
        };

        let arguments = params.get("arguments").cloned().unwrap_or_else(|| serde_json::json!({}));

        tracing::info!(tool = %tool_name, "Executing tool");

        match tool.execute(&self.ctx, arguments).await {
            Ok(output) => JsonRpcResponse::success(
                id,
                serde_json::json!({
                    "content": [{
                        "type": "text",
                        "text": output.text
                    }],
                    "isError": output.is_error
                }),
            ),
            Err(e) => {
                tracing::warn!(tool = %tool_name, error = %e, "Tool call rejected");
                JsonRpcResponse::error(id, codes::INVALID_PARAMS, e.to_user_message())
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").field("tools", &self.tools.len()).finish()
    }
}

fn initialize_result(params: &serde_json::Value) -> serde_json::Value {
    let protocol_version = params
        .get("protocolVersion")
        .and_then(|v| v.as_str())
        .unwrap_or(DEFAULT_PROTOCOL_VERSION);

    tracing::info!("MCP initialize: protocol version {}", protocol_version);

    serde_json::json!({
        "protocolVersion": protocol_version,
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}
