use super::{ServerError, ToolServer};
use crate::types::{ToolDescriptor, ToolOutput};

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use rmcp::ServiceExt;
use rmcp::model::{CallToolRequestParam, ClientCapabilities, ClientInfo, Implementation};
use rmcp::service::{RoleClient, RunningService};
use rmcp::transport::streamable_http_client::StreamableHttpClientTransportConfig;
use rmcp::transport::{ConfigureCommandExt, StreamableHttpClientTransport, TokioChildProcess};
use serde_json::Value;
use std::process::Stdio;
use tokio::process::Command;

/// A live MCP session. Both client variants produce the same session type;
/// only the transport used to establish it differs.
pub struct McpSession {
    service: Option<RunningService<RoleClient, ClientInfo>>,
}

impl McpSession {
    /// Connects to a remote server over streamable HTTP. The caller's auth
    /// headers are attached to every request, alongside the fixed content
    /// type the protocol expects.
    pub async fn connect_http(url: &str, auth_headers: HeaderMap) -> Result<Self, ServerError> {
        let mut headers = auth_headers;
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        let transport = StreamableHttpClientTransport::with_client(
            http,
            StreamableHttpClientTransportConfig::with_uri(url.to_owned()),
        );
        let service = client_info()
            .serve(transport)
            .await
            .map_err(|e| ServerError::Handshake(e.to_string()))?;
        Ok(Self::open(service))
    }

    /// Spawns the server as a child process and speaks the protocol over its
    /// stdio. Stderr is inherited so server diagnostics land on our console
    /// unparsed. A crashed child is not restarted; later calls just fail.
    pub async fn connect_stdio(command: &str, args: &[&str]) -> Result<Self, ServerError> {
        let transport = TokioChildProcess::new(Command::new(command).configure(|cmd| {
            cmd.args(args).stderr(Stdio::inherit());
        }))?;
        let service = client_info()
            .serve(transport)
            .await
            .map_err(|e| ServerError::Handshake(e.to_string()))?;
        Ok(Self::open(service))
    }

    fn open(service: RunningService<RoleClient, ClientInfo>) -> Self {
        tracing::info!(server = ?service.peer_info(), "connected to tool server");
        Self {
            service: Some(service),
        }
    }
}

fn client_info() -> ClientInfo {
    ClientInfo {
        capabilities: ClientCapabilities::default(),
        client_info: Implementation {
            name: "mcp-chat".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            ..Implementation::default()
        },
        ..ClientInfo::default()
    }
}

#[async_trait]
impl ToolServer for McpSession {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ServerError> {
        let service = self.service.as_ref().ok_or(ServerError::Closed)?;
        let tools = service.list_all_tools().await?;
        Ok(tools.into_iter().map(descriptor).collect())
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolOutput, ServerError> {
        let service = self.service.as_ref().ok_or(ServerError::Closed)?;
        let arguments = match arguments {
            Value::Object(map) => Some(map),
            Value::Null => None,
            _ => return Err(ServerError::InvalidArguments),
        };
        let result = service
            .call_tool(CallToolRequestParam {
                name: name.to_owned().into(),
                arguments,
            })
            .await?;
        let is_error = result.is_error.unwrap_or(false);
        if is_error {
            tracing::warn!(tool = name, "server reported a tool error");
        }
        let content = serde_json::to_value(&result.content).map_err(ServerError::Encode)?;
        Ok(ToolOutput { content, is_error })
    }

    async fn close(&mut self) -> Result<(), ServerError> {
        if let Some(service) = self.service.take() {
            let reason = service
                .cancel()
                .await
                .map_err(|e| ServerError::Shutdown(e.to_string()))?;
            tracing::info!(reason = ?reason, "server session closed");
        }
        Ok(())
    }
}

fn descriptor(tool: rmcp::model::Tool) -> ToolDescriptor {
    ToolDescriptor {
        name: tool.name.to_string(),
        description: tool
            .description
            .map(|d| d.to_string())
            .unwrap_or_default(),
        input_schema: Value::Object((*tool.input_schema).clone()),
    }
}
