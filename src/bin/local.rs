//! Chat client that spawns a local MCP server and speaks over its stdio.

use anyhow::{Context, Result};
use mcp_chat::{ChatClient, McpSession, OpenAiModel, shell};
use tokio::io::BufReader;

// Example server configuration; swap in your own command.
const SERVER_COMMAND: &str = "uvx";
const SERVER_ARGS: &[&str] = &[
    "--from",
    "git+https://github.com/henryhabib/mcpserverexample.git",
    "mcp-server",
];
const MODEL: &str = "gpt-4.1";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let server = McpSession::connect_stdio(SERVER_COMMAND, SERVER_ARGS)
        .await
        .context("could not start the tool server")?;

    let mut client = ChatClient::new(OpenAiModel::new(MODEL));
    client
        .connect(server)
        .await
        .context("could not fetch the tool catalog")?;

    println!("connected to local server ({SERVER_COMMAND})");
    println!("type your queries, or \"exit\" to quit");
    shell::run(
        client,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcp_chat=debug,info".parse().expect("valid env filter")),
        )
        .init();
}
