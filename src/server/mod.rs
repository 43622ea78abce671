mod mcp;

pub use mcp::McpSession;

use crate::types::{ToolDescriptor, ToolOutput};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("session is closed")]
    Closed,
    #[error("failed to start server process")]
    Spawn(#[from] std::io::Error),
    #[error("could not build the http transport")]
    Http(#[from] reqwest::Error),
    #[error("handshake with the server failed")]
    Handshake(String),
    #[error("server call failed")]
    Rpc(#[from] rmcp::service::ServiceError),
    #[error("tool arguments must be a json object")]
    InvalidArguments,
    #[error("could not encode tool result")]
    Encode(#[source] serde_json::Error),
    #[error("session shutdown failed")]
    Shutdown(String),
}

/// The server side of a session: the two remote-procedure operations the
/// protocol contract defines, plus teardown.
#[async_trait]
pub trait ToolServer: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ServerError>;

    /// Executes the named tool with model-supplied arguments. Server-side
    /// effects are opaque; each call runs exactly once, with no retry.
    async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolOutput, ServerError>;

    /// Idempotent. After closing, the other operations fail with `Closed`.
    async fn close(&mut self) -> Result<(), ServerError>;
}
