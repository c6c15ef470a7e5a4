//! MCP server implementation.

use super::protocol::*;
use crate::config::Settings;
use crate::tools::{tool_definitions, ToolContext};
use serde::Serialize;
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use tracing::{debug, info, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "gleaner";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server for Gleaner.
pub struct McpServer {
    context: ToolContext,
}

impl McpServer {
    /// Create a new MCP server.
    pub fn new(settings: Settings) -> Self {
        Self {
            context: ToolContext::new(settings),
        }
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    pub async fn run(&self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();

        info!("Gleaner MCP server starting");
        self.serve(stdin.lock(), stdout.lock()).await
    }

    /// Serve newline-delimited requests until the reader is exhausted.
    pub async fn serve<R: BufRead, W: Write>(
        &self,
        reader: R,
        mut writer: W,
    ) -> anyhow::Result<()> {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str(&line) {
                Ok(req) => req,
                Err(e) => {
                    warn!("Failed to parse request: {}", e);
                    let response = JsonRpcResponse::error(None, PARSE_ERROR, "Parse error");
                    writeln!(writer, "{}", serde_json::to_string(&response)?)?;
                    writer.flush()?;
                    continue;
                }
            };

            // Notifications carry no id and get no reply.
            let is_notification = request.id.is_none();
            let response = self.handle_request(request).await;
            if is_notification {
                continue;
            }

            writeln!(writer, "{}", serde_json::to_string(&response)?)?;
            writer.flush()?;
        }

        info!("Gleaner MCP server stopped");
        Ok(())
    }

    /// Handle a single JSON-RPC request.
    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        if request.jsonrpc != "2.0" {
            debug!("Request without jsonrpc 2.0 marker: {:?}", request.jsonrpc);
        }

        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "initialized" | "notifications/initialized" => {
                JsonRpcResponse::success(request.id, json!({}))
            }
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            ),
        }
    }

    /// Handle initialize request.
    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        respond(id, &result)
    }

    /// Handle tools/list request.
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ToolsListResult {
            tools: tool_definitions(),
        };
        respond(id, &result)
    }

    /// Handle tools/call request.
    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        INVALID_PARAMS,
                        &format!("Invalid params: {}", e),
                    )
                }
            },
            None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
        };

        let arguments = params.arguments.unwrap_or(Value::Null);
        let result = match self.context.call(&params.name, arguments).await {
            Ok(value) => match serde_json::to_string_pretty(&value) {
                Ok(text) => ToolCallResult::text(text),
                Err(e) => ToolCallResult::error(format!("Failed to encode result: {}", e)),
            },
            Err(e) => {
                warn!("Tool {} failed: {}", params.name, e);
                ToolCallResult::error(e.to_string())
            }
        };

        respond(id, &result)
    }
}

fn respond<T: Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, &e.to_string()),
    }
}
