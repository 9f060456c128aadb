//! MCP server over newline-delimited JSON-RPC.
//!
//! One request per line in, one response per line out. Requests are handled
//! strictly in arrival order. All diagnostics go to stderr through `tracing`;
//! stdout carries protocol messages only.

use anyhow::Result;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::mcp::handlers::Handlers;
use crate::mcp::protocol::{error_codes, JsonRpcId, JsonRpcRequest, JsonRpcResponse};
use crate::state::AppState;

pub struct McpServer {
    handlers: Handlers,
}

impl McpServer {
    pub fn new(state: AppState) -> Self {
        Self {
            handlers: Handlers::new(state),
        }
    }

    /// Serves stdin/stdout until stdin closes.
    pub async fn run_stdio(&self) -> Result<()> {
        self.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    pub async fn run<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Server ready, waiting for requests...");
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => {
                    debug!("Received: {}", line.trim_end());
                    self.handle_line(line).await
                }
                Err(e) => {
                    warn!("Received a line that is not valid UTF-8: {}", e);
                    Some(JsonRpcResponse::error(
                        None,
                        error_codes::PARSE_ERROR,
                        format!("Parse error: {e}"),
                    ))
                }
            };
            let Some(response) = response else {
                continue;
            };

            let response_json = serde_json::to_string(&response)?;
            debug!("Sending: {}", response_json);

            writer.write_all(response_json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        info!("Input closed, server shutting down");
        Ok(())
    }

    /// Parses and dispatches one line. `None` means nothing is sent back.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                warn!("Failed to parse request: {}", e);
                return Some(JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {e}"),
                ));
            }
        };

        // Valid JSON that is not a request still gets its id echoed back
        let id = value
            .get("id")
            .and_then(|id| serde_json::from_value::<JsonRpcId>(id.clone()).ok());
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                warn!("Malformed request: {}", e);
                return Some(JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_REQUEST,
                    format!("Invalid request: {e}"),
                ));
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id,
                error_codes::INVALID_REQUEST,
                "Invalid JSON-RPC version",
            ));
        }

        self.handlers.dispatch(request).await
    }
}
