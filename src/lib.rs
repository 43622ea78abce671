//! Chat clients that bridge a hosted language model to an MCP tool server.
//!
//! The library holds everything the two binaries share: the capability
//! traits ([`ModelService`], [`ToolServer`]), the relay loop on
//! [`ChatClient`], and the interactive [`shell`]. The binaries only differ
//! in how the session is established (streamable HTTP vs. a spawned child
//! process).

pub mod client;
pub mod model;
pub mod server;
pub mod shell;
pub mod types;

pub use client::{ChatClient, RelayError, Session};
pub use model::{ModelService, OpenAiModel};
pub use server::{McpSession, ServerError, ToolServer};
